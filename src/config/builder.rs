// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::num::NonZeroUsize;

use crate::config::consts::{DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::config::Config;
use crate::engine::BoundedDispatcher;
use crate::errors::ConfigurationError;

/// Builder for [`BoundedDispatcher`].
///
/// Options are applied once, at [`build`](Self::build) time; the capacity of
/// the resulting dispatcher cannot change afterwards.
///
/// # Examples
///
/// ```
/// use bounded_dispatcher::engine::BoundedDispatcher;
///
/// let dispatcher = BoundedDispatcher::builder().capacity(4).build().unwrap();
/// assert_eq!(dispatcher.capacity(), 4);
///
/// assert!(BoundedDispatcher::builder().capacity(0).build().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DispatcherBuilder {
    capacity: usize,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from a loaded configuration document.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            capacity: cfg.dispatcher.get_capacity(),
        }
    }

    /// Maximum number of work items allowed to execute at once.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn build(self) -> Result<BoundedDispatcher, ConfigurationError> {
        let capacity = validate_capacity(self.capacity)?;
        Ok(BoundedDispatcher::from_capacity(capacity))
    }
}

/// Check that a capacity can back an admission gate.
pub fn validate_capacity(capacity: usize) -> Result<NonZeroUsize, ConfigurationError> {
    let capacity = NonZeroUsize::new(capacity).ok_or(ConfigurationError::ZeroCapacity)?;
    if capacity.get() > MAX_CAPACITY {
        return Err(ConfigurationError::CapacityTooLarge {
            capacity: capacity.get(),
            max: MAX_CAPACITY,
        });
    }
    Ok(capacity)
}
