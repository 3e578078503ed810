//! Layered configuration loading.
//!
//! Sources, lowest precedence first: built-in defaults, an optional config
//! file (format picked from its extension), then `WARDWATCH_*` environment
//! variables such as `WARDWATCH_TICK_INTERVAL_MS=500`.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use wardwatch_engine::WardConfig;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "WARDWATCH";

pub fn load(config_path: Option<&Path>) -> Result<WardConfig> {
    let mut builder = Config::builder();
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path));
    }
    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    let settings: WardConfig = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    settings.validate()?;
    Ok(settings)
}
