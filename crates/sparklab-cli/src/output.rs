//! Formatted output helpers for CLI commands.
//!
//! Progress and status lines go to stderr; command results (the `config`
//! views) go to stdout.

#![allow(clippy::print_stderr)]

use std::fmt::Write as _;
use std::io::Write as _;

use sparklab_compose::model::PortConfig;

pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";
pub const YELLOW: &str = "\x1b[33m";
pub const RESET: &str = "\x1b[0m";

/// Prints the launcher banner.
pub fn header() {
    eprintln!();
    eprintln!(
        "  {BOLD}{}{RESET} {DIM}v{}{RESET}",
        sparklab_common::constants::APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
}

/// Prints an in-progress step.
pub fn step(message: &str) {
    eprintln!("  {message}...");
}

/// Prints a completed step.
pub fn success(message: &str) {
    eprintln!("  {GREEN}✓{RESET} {message}");
}

/// Prints a warning the user should act on.
pub fn warn(message: &str) {
    eprintln!("  {YELLOW}Warning:{RESET} {message}");
}

/// Prints a de-emphasized detail line.
pub fn detail(message: &str) {
    eprintln!("    {DIM}{message}{RESET}");
}

/// Prints a suggestion for what to do next.
pub fn hint(message: &str) {
    eprintln!();
    eprintln!("  {message}");
}

/// Prints the URLs of the running services.
pub fn service_urls(ports: PortConfig) {
    eprintln!();
    for (label, url) in urls(ports) {
        eprintln!("  {CYAN}{label:<16}{RESET} {BOLD}{url}{RESET}");
    }
}

/// Writes `text` to stdout.
///
/// # Errors
///
/// Returns an error if stdout is closed.
pub fn stdout(text: &str) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// Service label and host URL pairs.
#[must_use]
pub fn urls(ports: PortConfig) -> [(&'static str, String); 3] {
    [
        ("Jupyter", format!("http://localhost:{}", ports.jupyter)),
        ("Spark master UI", format!("http://localhost:{}", ports.master_ui)),
        ("Spark master", format!("spark://localhost:{}", ports.master)),
    ]
}

/// Formats a byte count into a human-readable string (e.g., "2.0 GiB").
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;
    const TIB: u64 = GIB * 1024;

    if bytes >= TIB {
        format!("{:.1} TiB", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Renders titled groups of key/value rows with aligned values.
#[must_use]
pub fn format_table<'a>(sections: impl IntoIterator<Item = (&'a str, Vec<(String, String)>)>) -> String {
    let sections: Vec<_> = sections.into_iter().collect();
    let width = sections
        .iter()
        .flat_map(|(_, rows)| rows.iter().map(|(k, _)| k.len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (i, (title, rows)) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{title}");
        for (key, value) in rows {
            let _ = writeln!(out, "  {key:<width$}  {value}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_displays_bytes() {
        assert_eq!(format_bytes(512), "512 B");
    }

    #[test]
    fn format_bytes_displays_mib() {
        assert_eq!(format_bytes(536_870_912), "512.0 MiB");
    }

    #[test]
    fn format_bytes_displays_gib() {
        assert_eq!(format_bytes(2_147_483_648), "2.0 GiB");
    }

    #[test]
    fn format_table_aligns_values() {
        let table = format_table([
            ("Ports", vec![("JUPYTER_PORT".into(), "8888".into())]),
            ("Network", vec![("NETWORK_NAME".into(), "spark-network".into())]),
        ]);
        assert_eq!(
            table,
            "Ports\n  JUPYTER_PORT  8888\n\nNetwork\n  NETWORK_NAME  spark-network\n"
        );
    }

    #[test]
    fn urls_use_host_ports() {
        let ports = PortConfig {
            jupyter: 9999,
            master_ui: 9080,
            master: 9077,
            worker_ui: 9081,
        };
        let urls = urls(ports);
        assert_eq!(urls[0].1, "http://localhost:9999");
        assert_eq!(urls[2].1, "spark://localhost:9077");
    }
}
