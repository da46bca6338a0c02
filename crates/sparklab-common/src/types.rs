//! Domain primitive types used across the sparklab workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest accepted memory size. Docker refuses limits below a few
/// megabytes and Spark rounds sub-megabyte sizes down to zero.
pub const MIN_MEMORY_BYTES: u64 = 1 << 20;

/// A memory size in the notation shared by Spark and Docker (`512m`, `2g`).
///
/// Accepts a positive integer followed by a `k|m|g|t` unit and at most one
/// trailing `b`, case-insensitive. A bare number is rejected: Docker reads it
/// as bytes and Spark as megabytes. The original spelling is preserved so the
/// generated artifacts echo exactly what the user wrote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemorySize(String);

impl MemorySize {
    /// Returns the size as written in the configuration document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the size in bytes, or `None` on overflow.
    #[must_use]
    pub fn bytes(&self) -> Option<u64> {
        let (digits, unit) = split_memory(&self.0)?;
        to_bytes(digits, unit)
    }
}

/// Splits a memory string into its digits and lowercase unit letter.
fn split_memory(raw: &str) -> Option<(&str, char)> {
    let body = raw
        .strip_suffix(['b', 'B'])
        .filter(|rest| !rest.is_empty())
        .unwrap_or(raw);
    let unit = body.chars().last()?;
    let digits = &body[..body.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match unit.to_ascii_lowercase() {
        u @ ('k' | 'm' | 'g' | 't') => Some((digits, u)),
        _ => None,
    }
}

fn to_bytes(digits: &str, unit: char) -> Option<u64> {
    let value: u64 = digits.parse().ok()?;
    let shift = match unit {
        'k' => 10,
        'm' => 20,
        'g' => 30,
        't' => 40,
        _ => return None,
    };
    value.checked_mul(1u64 << shift)
}

impl FromStr for MemorySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some((digits, unit)) = split_memory(trimmed) else {
            return Err(format!(
                "\"{s}\" is not a memory size (expected a number with a k, m, g or t unit, e.g. 512m, 2g)"
            ));
        };
        match to_bytes(digits, unit) {
            None => Err(format!("\"{s}\" is too large")),
            Some(bytes) if bytes < MIN_MEMORY_BYTES => {
                Err(format!("\"{s}\" is below the 1m minimum"))
            }
            Some(_) => Ok(Self(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for MemorySize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemorySize> for String {
    fn from(value: MemorySize) -> Self {
        value.0
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Python package requirement: a name plus an optional version constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PythonPackage {
    /// Distribution name as published on the package index.
    pub name: String,
    /// Version constraint such as `>=2.0` or `==1.5.3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

const CONSTRAINT_OPERATORS: [&str; 8] = ["===", "==", "!=", "~=", ">=", "<=", ">", "<"];

impl PythonPackage {
    /// Parses the pip requirement form (`pandas>=2.0`, `numpy`).
    #[must_use]
    pub fn from_requirement(spec: &str) -> Self {
        let spec = spec.trim();
        let split = spec.find(['=', '!', '~', '<', '>']);
        match split {
            Some(idx) => Self {
                name: spec[..idx].trim().to_string(),
                version: Some(spec[idx..].trim().to_string()),
            },
            None => Self {
                name: spec.to_string(),
                version: None,
            },
        }
    }

    /// Renders the pip requirement string.
    ///
    /// A bare version such as `2.0` is pinned with `==`.
    #[must_use]
    pub fn requirement(&self) -> String {
        match self.version.as_deref().map(str::trim) {
            None | Some("") => self.name.clone(),
            Some(v) if CONSTRAINT_OPERATORS.iter().any(|op| v.starts_with(op)) => {
                format!("{}{v}", self.name)
            }
            Some(v) => format!("{}=={v}", self.name),
        }
    }
}

impl fmt::Display for PythonPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.requirement())
    }
}
