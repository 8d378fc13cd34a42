//! Application configuration for agentsync.
//!
//! User config lives at `~/.agentsync/agentsync.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AgentSyncError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "agentsync.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".agentsync";

// ---------------------------------------------------------------------------
// Config structs (matching agentsync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Control-plane connection settings.
    #[serde(default)]
    pub control_plane: ControlPlaneConfig,

    /// Ingestion dispatch settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// `[control_plane]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlPlaneConfig {
    /// Base URL of the control-plane API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name of the env var holding the API token (never store the token itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://agents.example.com".into()
}
fn default_api_key_env() -> String {
    "AGENTSYNC_API_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[dispatch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum concurrent ingestion job triggers.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> u32 {
    4
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.agentsync/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AgentSyncError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.agentsync/agentsync.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AgentSyncError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        AgentSyncError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| AgentSyncError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| AgentSyncError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AgentSyncError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the control-plane API token from the configured env var.
///
/// Token acquisition (SSO, assumed roles, etc.) is the operator's problem;
/// agentsync only requires the resolved token to be present in the ambient
/// environment.
pub fn resolve_api_token(config: &AppConfig) -> Result<String> {
    let var_name = &config.control_plane.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(AgentSyncError::config(format!(
            "control-plane API token not found. Set the {var_name} environment variable."
        ))),
    }
}
