//! Configuration file handling for tflens
//!
//! A single `config.toml` under the user config directory, overridable
//! per invocation from the command line.

pub mod settings;
pub mod types;

pub use settings::{
    default_config_path, init_config, load_settings, save_settings, SettingsOverrides,
};
pub use types::*;
