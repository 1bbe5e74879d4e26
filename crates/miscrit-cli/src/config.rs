//! Calculator configuration.
//!
//! Provides file locations and initial session toggles. Configuration can be
//! loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "miscalc.toml";

/// Directory under the platform config dir.
const APP_DIR: &str = "miscalc";

/// Default entity database file.
pub const DEFAULT_DATABASE_PATH: &str = "miscritsdb.json";

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "miscalc=info";

/// Calculator configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    /// Entity database (JSON)
    pub database_path: PathBuf,
    /// Directory holding the custom-profile store
    pub store_dir: PathBuf,
    /// Start with the average-tier defense remap on
    pub avg_def: bool,
    /// Start on the enhanced attack tab
    pub enhanced: bool,
    /// Tracing filter directive, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            store_dir: default_store_dir(),
            avg_def: false,
            enhanced: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CalcConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                info!("Loaded config from {}", path.display());
                config.validate();
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join(APP_DIR).join(CONFIG_FILE),
            None => PathBuf::from(CONFIG_FILE),
        }
    }

    /// Put empty values back to their defaults.
    pub fn validate(&mut self) {
        if self.database_path.as_os_str().is_empty() {
            self.database_path = PathBuf::from(DEFAULT_DATABASE_PATH);
        }
        if self.store_dir.as_os_str().is_empty() {
            self.store_dir = default_store_dir();
        }
        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
    }
}

fn default_store_dir() -> PathBuf {
    dirs::config_dir().map_or_else(|| PathBuf::from("."), |dir| dir.join(APP_DIR))
}
