use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::storage::FileStorage;

/// Settings persisted between CLI invocations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliSettings {
    pub api_base_url: Option<String>,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("PLANBOARD_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("planboard").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_settings() -> anyhow::Result<CliSettings> {
    let settings_file = get_config_dir()?.join("settings.json");

    if !settings_file.exists() {
        return Ok(CliSettings::default());
    }

    let content = fs::read_to_string(settings_file)?;
    let settings: CliSettings = serde_json::from_str(&content)?;
    Ok(settings)
}

pub fn save_settings(settings: &CliSettings) -> anyhow::Result<()> {
    let settings_file = get_config_dir()?.join("settings.json");

    let content = serde_json::to_string_pretty(settings)?;
    fs::write(settings_file, content)?;
    Ok(())
}

/// Session storage file: `PLANBOARD_STORAGE_DIR` when configured, the CLI config dir otherwise
pub fn session_file(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let dir = match &config.storage.directory {
        Some(dir) => dir.clone(),
        None => get_config_dir()?,
    };
    Ok(dir.join("session.json"))
}

/// Effective configuration: environment first, then the saved base URL
pub fn effective_config() -> anyhow::Result<AppConfig> {
    let mut config = crate::config::config().clone();
    let settings = load_settings()?;

    if std::env::var("PLANBOARD_API_BASE_URL").is_err() {
        if let Some(url) = settings.api_base_url {
            config.api.base_url = url;
        }
    }
    Ok(config)
}

/// Build an application context backed by the on-disk session
pub fn open_context() -> anyhow::Result<AppContext> {
    let config = effective_config()?;
    let storage = FileStorage::open(session_file(&config)?)?;
    Ok(AppContext::new(config, Arc::new(storage))?)
}
