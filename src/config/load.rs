//! Loading the lifecycle configuration from YAML

use std::fs;
use std::path::Path;

use super::schema::LifecycleConfig;
use super::validate::validate_config;
use crate::{Error, Result};

/// Load, resolve and validate a configuration file
///
/// Relative paths inside the file are resolved against the file's own
/// directory, so the loop behaves the same regardless of where it is started.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<LifecycleConfig> {
    let config_path = config_path.as_ref();
    let yaml_content = fs::read_to_string(config_path).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {e}",
            config_path.display()
        ))
    })?;

    let mut config = parse_config(&yaml_content)?;
    if let Some(base) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        config.paths.resolve_against(base);
    }
    Ok(config)
}

/// Parse and validate a YAML document; paths are left as written
pub fn parse_config(yaml: &str) -> Result<LifecycleConfig> {
    let config: LifecycleConfig = if yaml.trim().is_empty() {
        LifecycleConfig::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?
    };

    validate_config(&config).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;
    Ok(config)
}
