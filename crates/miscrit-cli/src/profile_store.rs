//! File-backed custom profile store.
//!
//! The profile list lives in `<store_dir>/customMiscrits.json` as a JSON
//! array of `{name, baseName, stats}` records.

use std::fs;
use std::path::{Path, PathBuf};

use miscrit_calc::custom::{CustomProfile, ProfileRepository, CUSTOM_PROFILES_KEY};
use miscrit_common::StoreResult;
use tracing::{debug, info, warn};

/// Profile repository backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Store inside `store_dir` under the standard file name.
    #[must_use]
    pub fn in_dir(store_dir: impl AsRef<Path>) -> Self {
        Self::with_path(store_dir.as_ref().join(format!("{CUSTOM_PROFILES_KEY}.json")))
    }

    /// Store at an explicit file path.
    #[must_use]
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileRepository for JsonFileRepository {
    fn load_all(&self) -> Vec<CustomProfile> {
        if !self.path.exists() {
            debug!("Profile store {:?} not found, starting empty", self.path);
            return Vec::new();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read profile store: {e}");
                return Vec::new();
            },
        };

        match serde_json::from_str::<Vec<CustomProfile>>(&contents) {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("Ignoring unreadable profile store: {e}");
                Vec::new()
            },
        }
    }

    fn save_all(&self, profiles: &[CustomProfile]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(profiles)?;
        fs::write(&self.path, json)?;

        info!("Saved {} custom profiles to {:?}", profiles.len(), self.path);
        Ok(())
    }
}
