//! Configuration loading and root folder resolution
//!
//! The root folder holds the SQLite database and is resolved with the
//! following priority order:
//! 1. Command-line argument (highest priority)
//! 2. `VTRK_ROOT_FOLDER` environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "VTRK_ROOT_FOLDER";

/// Environment variable naming the Discogs personal access token
pub const DISCOGS_TOKEN_ENV: &str = "VTRK_DISCOGS_TOKEN";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder override
    pub root_folder: Option<String>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Discogs personal access token (optional; enables provenance lookups)
    pub discogs_token: Option<String>,
}

/// Logging section of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file path (stdout when unset)
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Load the TOML config from the platform config directory.
///
/// A missing or unreadable file is not an error; defaults apply.
pub fn load_toml_config() -> TomlConfig {
    let Some(path) = config_file_path() else {
        return TomlConfig::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<TomlConfig>(&content) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring malformed config file {}: {}", path.display(), e);
                TomlConfig::default()
            }
        },
        Err(_) => TomlConfig::default(),
    }
}

/// Locate the config file for the platform, if one exists
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("vtrk").join("config.toml"));
    if let Some(path) = &user_config {
        if path.exists() {
            return user_config;
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/vtrk/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the root folder following the documented priority order
pub fn resolve_root_folder(cli_arg: Option<&str>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        info!("Root folder from command line: {}", path);
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            info!("Root folder from {}: {}", ROOT_FOLDER_ENV, path);
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        info!("Root folder from config file: {}", path);
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    let default = default_root_folder();
    info!("Root folder default: {}", default.display());
    default
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("vtrk"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/vtrk"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("vtrk"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/vtrk"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("vtrk"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\vtrk"))
    } else {
        PathBuf::from("./vtrk_data")
    }
}

/// Prepares the resolved root folder for use
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder directory if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder).map_err(|e| {
                Error::Config(format!(
                    "Failed to create root folder {}: {}",
                    self.root_folder.display(),
                    e
                ))
            })?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Path of the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("vinyltrack.db")
    }
}

/// Resolve the Discogs token from environment or TOML config.
///
/// The token is optional; `None` disables Discogs provenance lookups.
pub fn resolve_discogs_token(toml_config: &TomlConfig) -> Option<String> {
    let env_token = std::env::var(DISCOGS_TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty());
    let toml_token = toml_config
        .discogs_token
        .clone()
        .filter(|t| !t.trim().is_empty());

    if env_token.is_some() && toml_token.is_some() {
        warn!(
            "Discogs token found in both {} and config file; using environment",
            DISCOGS_TOKEN_ENV
        );
    }

    if let Some(token) = env_token {
        info!("Discogs token loaded from environment variable");
        return Some(token);
    }

    if let Some(token) = toml_token {
        info!("Discogs token loaded from config file");
        return Some(token);
    }

    None
}
