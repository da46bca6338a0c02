//! Project layout: where the configuration document and the generated
//! artifacts live.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;

/// Resolved file locations for a sparklab project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLayout {
    /// Project root directory. Volume paths are resolved against it.
    pub root: PathBuf,
    /// Path to the configuration document.
    pub config_file: PathBuf,
    /// Path to the generated environment settings file.
    pub env_file: PathBuf,
    /// Path to the generated compose manifest.
    pub manifest_file: PathBuf,
}

impl ProjectLayout {
    /// Builds the standard layout rooted at `root`.
    #[must_use]
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_file: root.join(constants::CONFIG_FILE),
            env_file: root.join(constants::ENV_FILE),
            manifest_file: root.join(constants::MANIFEST_FILE),
            root,
        }
    }

    /// Replaces the configuration document path, keeping artifact paths.
    #[must_use]
    pub fn with_config_file(mut self, config_file: impl Into<PathBuf>) -> Self {
        self.config_file = config_file.into();
        self
    }

    /// Directory containing the compose manifest.
    ///
    /// The container runtime resolves relative bind mounts against it.
    #[must_use]
    pub fn manifest_dir(&self) -> &Path {
        self.manifest_file.parent().unwrap_or(self.root.as_path())
    }

    /// Both generated artifact paths, env file first.
    #[must_use]
    pub fn artifact_paths(&self) -> [&Path; 2] {
        [self.env_file.as_path(), self.manifest_file.as_path()]
    }
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self::for_root(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_uses_fixed_artifact_locations() {
        let layout = ProjectLayout::for_root("/srv/lab");
        assert_eq!(layout.config_file, Path::new("/srv/lab/config/config.yaml"));
        assert_eq!(layout.env_file, Path::new("/srv/lab/config/.env"));
        assert_eq!(
            layout.manifest_file,
            Path::new("/srv/lab/docker/docker-compose.yml")
        );
        assert_eq!(layout.manifest_dir(), Path::new("/srv/lab/docker"));
    }

    #[test]
    fn custom_config_keeps_artifacts() {
        let layout = ProjectLayout::for_root("/srv/lab").with_config_file("/tmp/alt.yaml");
        assert_eq!(layout.config_file, Path::new("/tmp/alt.yaml"));
        assert_eq!(layout.env_file, Path::new("/srv/lab/config/.env"));
    }
}
