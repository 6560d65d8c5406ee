// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while configuring a dispatcher.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a dispatcher or loading its configuration.
///
/// All of these surface at construction time, never in the middle of a run.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A capacity of zero would never admit any work
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    /// The capacity exceeds the number of blocking threads available to run items
    #[error("capacity {capacity} exceeds the maximum supported capacity of {max}")]
    CapacityTooLarge { capacity: usize, max: usize },

    /// The configuration file could not be read
    #[error("failed to read configuration file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for this schema
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration document is not valid TOML for this schema
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension is neither YAML nor TOML
    #[error("unsupported configuration format for '{}': expected .yaml, .yml or .toml", .path.display())]
    UnsupportedFormat { path: PathBuf },
}
