//! Settings loading, saving and command-line overrides

use std::path::{Path, PathBuf};

use tflens_core::prelude::*;
use tflens_core::PairingMode;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "tflens";

/// Default location: `<config_dir>/tflens/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILENAME)
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from `config_path`
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Write a commented default config file if none exists yet
pub fn init_config(config_path: &Path) -> Result<()> {
    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
    }

    if !config_path.exists() {
        let default_content = r#"# tflens configuration

[backend]
base_url = "http://127.0.0.1:8000/api"
timeout_secs = 30

[view]
page_size = 50
pairing = "tf_req_id"   # tf_req_id | resource | phase
group_rows = true
include_pairs = false   # add rows sharing a key with the page

[timeline]
chart_width = 800
min_bar_width = 6
tick_count = 5
label_max_chars = 30

[export]
# directory = "/tmp/tflens-exports"   # defaults to the working directory

[state]
# path = "/home/me/.local/share/tflens/state.json"
"#;
        std::fs::write(config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

/// Save settings to `config_path`
///
/// Uses atomic write (temp file + rename).
pub fn save_settings(config_path: &Path, settings: &Settings) -> Result<()> {
    let dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
    }

    let temp_path = dir.join(".config.toml.tmp");

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    let full_content = format!("# tflens configuration\n\n{}", content);

    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;

    std::fs::rename(&temp_path, config_path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Command-line overrides
// ─────────────────────────────────────────────────────────────────────────────

/// Values given on the command line; `None` keeps the file setting
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub pairing: Option<PairingMode>,
    pub page_size: Option<u32>,
}

impl SettingsOverrides {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.base_url {
            settings.backend.base_url = url.clone();
        }
        if let Some(pairing) = self.pairing {
            settings.view.pairing = pairing;
        }
        if let Some(size) = self.page_size.filter(|s| *s > 0) {
            settings.view.page_size = size;
        }
    }
}
