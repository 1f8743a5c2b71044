//! Storage configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabula_core::{Error, Result};

/// Configuration for a [`Storage`](crate::Storage) instance.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// data_dir = "/var/lib/tabula"
/// sync_on_write = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one snapshot file per table.
    pub data_dir: PathBuf,
    /// Extension of snapshot files, without the dot.
    pub file_extension: String,
    /// Whether to fsync each snapshot before renaming it into place.
    pub sync_on_write: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            file_extension: "tbl".to_string(),
            sync_on_write: false,
        }
    }
}

impl StorageConfig {
    /// Creates a configuration with defaults and the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Sets whether snapshots are synced to disk before being renamed.
    pub fn with_sync_on_write(mut self, sync: bool) -> Self {
        self.sync_on_write = sync;
        self
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks field values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        let ext = &self.file_extension;
        if ext.is_empty() || ext.contains('.') || ext.contains(std::path::MAIN_SEPARATOR) {
            return Err(Error::Config(format!("invalid file extension: {:?}", ext)));
        }
        if ext == "tmp" {
            return Err(Error::Config("file extension \"tmp\" is reserved".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.file_extension, "tbl");
        assert!(!config.sync_on_write);
    }

    #[test]
    fn test_builder() {
        let config = StorageConfig::new("/tmp/x").with_sync_on_write(true);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
        assert!(config.sync_on_write);
        assert_eq!(config.file_extension, "tbl");
    }

    #[test]
    fn test_partial_toml() {
        let config = StorageConfig::from_toml("data_dir = \"/srv/tabula\"").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/tabula"));
        assert_eq!(config.file_extension, "tbl");

        let config = StorageConfig::from_toml("").unwrap();
        assert_eq!(config, StorageConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            StorageConfig::from_toml("data_dir = 5"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            StorageConfig::from_toml("file_extension = \"a.b\""),
            Err(Error::Config(_))
        ));
        assert!(StorageConfig::from_toml("file_extension = \"tmp\"").is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabula.toml");
        std::fs::write(&path, "file_extension = \"dat\"\nsync_on_write = true\n").unwrap();

        let config = StorageConfig::load(&path).unwrap();
        assert_eq!(config.file_extension, "dat");
        assert!(config.sync_on_write);

        assert!(matches!(
            StorageConfig::load(dir.path().join("missing.toml")),
            Err(Error::Config(_))
        ));
    }
}
