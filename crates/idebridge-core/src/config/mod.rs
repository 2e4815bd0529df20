//! Bridge configuration
//!
//! Sources, later ones win:
//! - built-in defaults
//! - YAML file (`~/.config/idebridge/config.yaml` or an explicit path)
//! - environment (`IDE_PORT`, `HOST`, `LOG_ENABLED`)
//!
//! Command-line flags are applied on top by the host binary.

mod error;
mod file;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use file::FileConfigSource;
pub use settings::{
    BridgeConfig, ENV_HOST, ENV_LOG_ENABLED, ENV_PORT, DEFAULT_HOST, DEFAULT_PATH_PREFIX,
    DEFAULT_SCAN_END, DEFAULT_SCAN_START,
};
