// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// A configuration file was loaded.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use bounded_dispatcher::observability::messages::config::ConfigLoaded;
/// use std::path::Path;
///
/// let msg = ConfigLoaded {
///     path: Path::new("dispatcher.yaml"),
///     capacity: Some(4),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ConfigLoaded<'a> {
    pub path: &'a Path,
    pub capacity: Option<usize>,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.capacity {
            Some(capacity) => write!(
                f,
                "Loaded dispatcher configuration from '{}': capacity={}",
                self.path.display(),
                capacity
            ),
            None => write!(
                f,
                "Loaded dispatcher configuration from '{}': capacity=default",
                self.path.display()
            ),
        }
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            capacity = ?self.capacity,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_loaded",
            span_name = name,
            path = %self.path.display(),
        )
    }
}
