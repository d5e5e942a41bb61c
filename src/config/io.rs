use super::models::InteractionConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Parse a sectioned TOML document into the flat config.
pub fn parse_config(contents: &str) -> Result<InteractionConfig> {
    let tables: ConfigTables =
        toml::from_str(contents).context("Failed to parse interaction config TOML")?;
    Ok(tables.into())
}

pub fn serialize_config(config: &InteractionConfig) -> Result<String> {
    let tables = ConfigTables::from(config);
    toml::to_string(&tables).context("Failed to serialize interaction config")
}

/// Load the config at `path`, falling back to defaults on any failure.
pub fn load_config(path: &Path) -> InteractionConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded interaction config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return InteractionConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            InteractionConfig::default()
        }
    }
}
