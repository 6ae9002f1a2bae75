//! Configuration types for tflens

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use tflens_core::PairingMode;

/// Application settings (`config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub view: ViewSettings,

    #[serde(default)]
    pub timeline: TimelineSettings,

    #[serde(default)]
    pub export: ExportSettings,

    #[serde(default)]
    pub state: StateSettings,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackendSettings {
    /// API root, e.g. `http://127.0.0.1:8000/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Log view defaults
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewSettings {
    /// Entries per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Initial pairing mode (`tf_req_id`, `resource` or `phase`)
    #[serde(default)]
    pub pairing: PairingMode,

    /// Cluster rows into groups
    #[serde(default = "default_true")]
    pub group_rows: bool,

    /// Ask the backend for rows sharing a key with the page
    #[serde(default)]
    pub include_pairs: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            pairing: PairingMode::default(),
            group_rows: true,
            include_pairs: false,
        }
    }
}

fn default_page_size() -> u32 {
    50
}

fn default_true() -> bool {
    true
}

/// Timeline chart geometry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimelineSettings {
    /// Width of the bar area in layout units
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    /// Narrowest bar drawn, so short buckets stay visible
    #[serde(default = "default_min_bar_width")]
    pub min_bar_width: u32,

    /// Number of axis intervals; ticks are `tick_count + 1`
    #[serde(default = "default_tick_count")]
    pub tick_count: u32,

    /// Lane labels longer than this are shortened
    #[serde(default = "default_label_max_chars")]
    pub label_max_chars: usize,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            chart_width: default_chart_width(),
            min_bar_width: default_min_bar_width(),
            tick_count: default_tick_count(),
            label_max_chars: default_label_max_chars(),
        }
    }
}

fn default_chart_width() -> u32 {
    800
}

fn default_min_bar_width() -> u32 {
    6
}

fn default_tick_count() -> u32 {
    5
}

fn default_label_max_chars() -> usize {
    30
}

/// Export download settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExportSettings {
    /// Where downloads are written; empty means the working directory
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl ExportSettings {
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Persisted selection state settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StateSettings {
    /// State file; defaults to `<data_local_dir>/tflens/state.json`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StateSettings {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tflens")
                .join("state.json")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.backend.base_url, "http://127.0.0.1:8000/api");
        assert_eq!(s.backend.timeout_secs, 30);
        assert_eq!(s.view.page_size, 50);
        assert_eq!(s.view.pairing, PairingMode::Correlation);
        assert!(s.view.group_rows);
        assert!(!s.view.include_pairs);
        assert_eq!(s.timeline.chart_width, 800);
        assert_eq!(s.timeline.min_bar_width, 6);
        assert_eq!(s.timeline.tick_count, 5);
        assert_eq!(s.timeline.label_max_chars, 30);
        assert!(s.state.resolved_path().ends_with("tflens/state.json"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let s: Settings = toml::from_str(
            r#"
[view]
pairing = "resource"
page_size = 100
"#,
        )
        .unwrap();
        assert_eq!(s.view.pairing, PairingMode::Resource);
        assert_eq!(s.view.page_size, 100);
        assert!(s.view.group_rows);
        assert_eq!(s.backend, BackendSettings::default());
    }
}
