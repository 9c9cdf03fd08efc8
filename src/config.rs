use loadout_snapshot::SnapshotKeys;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/loadout.toml";
const DEFAULT_STORE_PATH: &str = "saves/properties.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadoutConfig {
    /// JSON dump of a property store, used when `--store` is not given.
    pub store_path: PathBuf,
    /// Key prefixes of the two snapshot halves.
    pub keys: SnapshotKeys,
}

impl Default for LoadoutConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            keys: SnapshotKeys::default(),
        }
    }
}

impl LoadoutConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<LoadoutConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    LoadoutConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                LoadoutConfig::default()
            }
        }
    }
}
