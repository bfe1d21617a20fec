//! # tally-config
//!
//! Layered configuration loading for Tally using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TALLY_*` prefix, `__` as separator)
//! 2. `<root>/appsettings.local.json`
//! 3. `<root>/appsettings.json`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TALLY_PATHS__CAPTURES_FOLDER` -> `paths.captures_folder`,
//! `TALLY_LOGGING__LEVEL` -> `logging.level`, etc.
//!
//! # Settings File Sections
//!
//! Folder settings live under `paths`. A `PathSettings` section is read as
//! the same thing and wins over `paths` within the same file.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use tally_config::TallyConfig;
//!
//! let root = Path::new("/projects/site-42");
//! let config = TallyConfig::load_with_dotenv(root).expect("config");
//! let paths = config.paths.resolve(root).expect("paths");
//! println!("documents live in {}", paths.documents.display());
//! ```

mod error;
mod logging;
mod paths;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use paths::{PathSettings, WorkspacePaths};

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SETTINGS_FILE: &str = "appsettings.json";
pub const LOCAL_SETTINGS_FILE: &str = "appsettings.local.json";

/// Alternate section name for [`PathSettings`] in settings files.
pub const PATH_SETTINGS_SECTION: &str = "PathSettings";

const ENV_PREFIX: &str = "TALLY_";

/// Merge one settings file, mapping its `PathSettings` section onto `paths`.
fn merge_settings_file(figment: Figment, path: &Path) -> Figment {
    let figment = figment.merge(Json::file(path));
    match Figment::from(Json::file(path)).find_value(PATH_SETTINGS_SECTION) {
        Ok(section) => figment.merge(Serialized::default("paths", section)),
        Err(_) => figment,
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TallyConfig {
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TallyConfig {
    /// Load configuration for the workspace at `root`.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a settings file is malformed or a
    /// value has the wrong type.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::figment(root).extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `<root>/.env` into the environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(root: &Path) -> Result<Self, ConfigError> {
        let env_path = root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }
        Self::load(root)
    }

    /// Build the figment provider chain for `root`.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment(root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        for name in [SETTINGS_FILE, LOCAL_SETTINGS_FILE] {
            let path = root.join(name);
            if path.exists() {
                figment = merge_settings_file(figment, &path);
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Defaults plus `TALLY_*` environment variables, ignoring settings files.
    ///
    /// Used before the workspace root (and so its settings) is known.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if an environment value has the wrong type.
    pub fn from_env() -> Result<Self, ConfigError> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Write these settings as `<root>/appsettings.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Write` if the file cannot be written.
    pub fn write_settings(&self, root: &Path) -> Result<(), ConfigError> {
        let path = root.join(SETTINGS_FILE);
        let mut body = serde_json::to_string_pretty(self)?;
        body.push('\n');
        std::fs::write(&path, body).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}
