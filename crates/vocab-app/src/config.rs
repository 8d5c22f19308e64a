use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const CONFIG_DIR: &str = "vocab";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DATABASE: &str = "./vocabulary.db";
const DEFAULT_EXPORT_DIR: &str = "../data";

/// Top-level configuration loaded from `<config dir>/vocab/config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Database settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// `[storage]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

/// `[export]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ExportConfig {
    /// Directory receiving exported CSV files.
    #[serde(default = "default_export_dir")]
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
        }
    }
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}

/// Location of the per-user configuration file, if the platform has a config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

impl AppConfig {
    /// Load configuration from `explicit` or, when absent, from [`default_config_path`].
    ///
    /// An explicitly named file must exist; a missing default file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a known file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self =
            toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded values.
    #[must_use]
    pub fn with_overrides(mut self, database: Option<PathBuf>, export_dir: Option<PathBuf>) -> Self {
        if let Some(database) = database {
            self.storage.database = database;
        }
        if let Some(directory) = export_dir {
            self.export.directory = directory;
        }
        self
    }

    /// Reject empty paths.
    ///
    /// # Errors
    /// Returns an error naming the offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.storage.database.as_os_str().is_empty() {
            bail!("storage.database must not be empty");
        }
        if self.export.directory.as_os_str().is_empty() {
            bail!("export.directory must not be empty");
        }
        Ok(())
    }
}
