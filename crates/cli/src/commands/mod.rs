//! CLI command implementations.

use std::path::PathBuf;

use chatmirror_config::{ConfigError, WidgetConfig};

pub mod doctor;
pub mod once;
pub mod run;

/// Load the configuration from an explicit path or the default location,
/// applying environment variable overrides either way.
pub fn load_config(path: Option<PathBuf>) -> Result<WidgetConfig, ConfigError> {
    match path {
        Some(path) => WidgetConfig::load_with_env(&path),
        None => WidgetConfig::load(),
    }
}
