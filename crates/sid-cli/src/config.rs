use crate::error::{CliError, CliErrorResult};

use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{LevelFilter, info};
use serde::Deserialize;

pub(crate) const DATA_DIR_ENV: &str = "SID_DATA_DIR";
pub(crate) const APP_DIR_NAME: &str = "sid";
pub(crate) const CONFIG_FILENAME: &str = "config.toml";

pub(crate) const DEFAULT_STORAGE_FILENAME: &str = "session.json";
pub(crate) const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;
pub(crate) const DEFAULT_LOG_LEVEL_STRING: &str = "warn";
pub(crate) const DEFAULT_LOG_COLORED: bool = true;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub storage: StorageSettings,
    #[serde(skip)]
    data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub colored: bool,
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: String::from(DEFAULT_LOG_LEVEL_STRING),
            colored: DEFAULT_LOG_COLORED,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub filename: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            filename: String::from(DEFAULT_STORAGE_FILENAME),
        }
    }
}

impl Settings {
    /// Load settings for the resolved data directory.
    ///
    /// Loading order:
    /// 1. Resolve the data directory: --data-dir flag > SID_DATA_DIR env var
    ///    > platform data dir
    /// 2. Auto-create the data directory if it doesn't exist
    /// 3. Load config.toml from it if present, else use defaults
    /// 4. Apply SID_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load(data_dir_flag: Option<PathBuf>) -> CliErrorResult<Self> {
        let data_dir = Self::resolve_data_dir(data_dir_flag)?;

        // Auto-create data directory
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|e| CliError::Io {
                path: data_dir.clone(),
                source: e,
            })?;
        }

        let config_path = data_dir.join(CONFIG_FILENAME);

        let mut settings = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Settings::default()
        };

        settings.data_dir = data_dir;
        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> CliErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| CliError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Resolve the data directory.
    /// Priority: explicit flag > SID_DATA_DIR env var > platform data dir
    fn resolve_data_dir(flag: Option<PathBuf>) -> CliErrorResult<PathBuf> {
        if let Some(dir) = flag {
            return Ok(dir);
        }

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .ok_or(CliError::NoDataDir)
    }

    /// Validate all settings.
    /// Call after load() to catch errors before touching storage.
    pub fn validate(&self) -> CliErrorResult<()> {
        // Storage file must stay inside the data dir
        let storage_path = Path::new(&self.storage.filename);
        if storage_path.is_absolute() || self.storage.filename.contains("..") {
            return Err(CliError::config(
                "storage.filename must be relative and cannot contain '..'",
            ));
        }

        if self.storage.filename.is_empty() {
            return Err(CliError::config("storage.filename cannot be empty"));
        }

        Ok(())
    }

    /// The resolved data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Absolute path of the storage file inside the data directory.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.filename)
    }

    /// Effective log level; unknown strings fall back to the default.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.logging.level).unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Absolute path of the log file, if one is configured.
    /// Relative names land inside the data directory.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.logging.file.as_ref().map(|file| {
            let path = PathBuf::from(file);
            if path.is_absolute() {
                path
            } else {
                self.data_dir.join(path)
            }
        })
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  data_dir: {}", self.data_dir.display());
        info!("  storage: {}", self.storage.filename);
        info!(
            "  logging: {} (colored: {})",
            self.log_level(),
            self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Logging
        Self::apply_env_string("SID_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("SID_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("SID_LOG_FILE", &mut self.logging.file);

        // Storage
        Self::apply_env_string("SID_STORAGE_FILENAME", &mut self.storage.filename);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
