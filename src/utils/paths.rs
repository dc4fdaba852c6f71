use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::CoreError;

const DEFAULT_DIR_NAME: &str = ".subscription_core";
const CONFIG_FILE: &str = "config.json";
const SNAPSHOT_FILE: &str = "subscriptions.json";
const RATES_FILE: &str = "rates.json";

pub const HOME_ENV: &str = "SUBSCRIPTION_CORE_HOME";
pub const SNAPSHOT_ENV: &str = "SUBSCRIPTION_CORE_SNAPSHOT";

/// Returns the application data directory, defaulting to `~/.subscription_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Settings file inside the provided base directory.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Cached exchange-rate snapshot inside the provided base directory.
pub fn rates_file_in(base: &Path) -> PathBuf {
    base.join(RATES_FILE)
}

/// Resolves the subscription snapshot path: explicit override, then the
/// environment, then the default file in the app directory.
pub fn snapshot_file(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(custom) = env::var_os(SNAPSHOT_ENV) {
        return PathBuf::from(custom);
    }
    app_data_dir().join(SNAPSHOT_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
