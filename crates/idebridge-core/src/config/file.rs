//! File-based configuration source (YAML)

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, ConfigResult};
use super::settings::BridgeConfig;

/// YAML configuration file
///
/// Every key is optional; missing keys keep the value from the layer
/// below. A missing file is not an error.
///
/// ```yaml
/// host: 127.0.0.1
/// port: 63342
/// refresh_interval_secs: 10
/// cache_ttl_secs: 30
/// ```
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    /// Create a source for a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// User-level config (`~/.config/idebridge/config.yaml`)
    pub fn user() -> Self {
        // Use XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("idebridge").join("config.yaml"))
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the file on top of `base`. Returns `base` unchanged when the file does not exist.
    pub fn load_over(&self, base: BridgeConfig) -> ConfigResult<BridgeConfig> {
        if !self.exists() {
            return Ok(base);
        }

        let display = self.path.display().to_string();
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(base);
        }

        let overlay: serde_yaml::Value = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: display.clone(),
            message: e.to_string(),
        })?;

        // Merge at the mapping level so absent keys keep the lower layer's value.
        let mut merged = serde_yaml::to_value(&base).map_err(|e| ConfigError::Parse {
            path: display.clone(),
            message: e.to_string(),
        })?;
        match (&mut merged, overlay) {
            (serde_yaml::Value::Mapping(target), serde_yaml::Value::Mapping(source)) => {
                for (key, value) in source {
                    target.insert(key, value);
                }
            }
            (_, other) => {
                return Err(ConfigError::Parse {
                    path: display,
                    message: format!("expected a mapping at the top level, found {:?}", other),
                });
            }
        }

        serde_yaml::from_value(merged).map_err(|e| ConfigError::Parse {
            path: display,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_keeps_base() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileConfigSource::new(dir.path().join("nope.yaml"));
        assert!(!source.exists());

        let config = source.load_over(BridgeConfig::default()).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_only_present_keys() {
        let file = write_config("port: 63350\ncache_ttl_secs: 5\n");
        let mut base = BridgeConfig::default();
        base.host = "10.0.0.1".to_string();

        let config = FileConfigSource::new(file.path()).load_over(base).unwrap();
        assert_eq!(config.port, Some(63350));
        assert_eq!(config.cache_ttl_secs, 5);
        assert_eq!(config.host, "10.0.0.1");
        assert_eq!(config.refresh_interval_secs, 10);
    }

    #[test]
    fn test_empty_file_is_ignored() {
        let file = write_config("   \n");
        let config = FileConfigSource::new(file.path()).load_over(BridgeConfig::default()).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_malformed_yaml_is_reported() {
        let file = write_config("port: [unterminated\n");
        let err = FileConfigSource::new(file.path())
            .load_over(BridgeConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let file = write_config("port: not-a-number\n");
        let err = FileConfigSource::new(file.path())
            .load_over(BridgeConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_user_path_shape() {
        let source = FileConfigSource::user();
        assert!(source.path().ends_with("idebridge/config.yaml"));
    }
}
