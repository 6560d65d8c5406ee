// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_CAPACITY;
use crate::errors::ConfigurationError;
use crate::observability::messages::config::ConfigLoaded;
use crate::observability::messages::StructuredLog;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level configuration document.
///
/// Every section is optional; an empty document yields the built-in defaults.
///
/// # Example
/// ```yaml
/// dispatcher:
///   capacity: 4
/// ```
///
/// or, equivalently, in TOML:
///
/// ```toml
/// [dispatcher]
/// capacity = 4
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dispatcher: DispatcherOptions,
}

/// Dispatcher options.
///
/// # Fields
/// * `capacity` - Maximum number of work items executing at once (optional, defaults to 10)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatcherOptions {
    pub capacity: Option<usize>,
}

impl DispatcherOptions {
    /// The configured capacity, or the built-in default.
    pub fn get_capacity(&self) -> usize {
        self.capacity.unwrap_or(DEFAULT_CAPACITY)
    }
}

/// Parse a configuration document in YAML form.
pub fn parse_yaml(content: &str) -> Result<Config, ConfigurationError> {
    // serde_yaml rejects an empty document, which should mean "all defaults"
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Parse a configuration document in TOML form.
pub fn parse_toml(content: &str) -> Result<Config, ConfigurationError> {
    Ok(toml::from_str(content)?)
}

/// Load a config from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigurationError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&str) -> Result<Config, ConfigurationError> = match extension.as_deref() {
        Some("yaml") | Some("yml") => parse_yaml,
        Some("toml") => parse_toml,
        _ => {
            return Err(ConfigurationError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = parse(&content)?;

    ConfigLoaded {
        path,
        capacity: cfg.dispatcher.capacity,
    }
    .log();

    Ok(cfg)
}

/// Load a config and reject values that could never produce a working dispatcher.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigurationError> {
    let cfg = load_config(path)?;
    crate::config::validate_capacity(cfg.dispatcher.get_capacity())?;
    Ok(cfg)
}
