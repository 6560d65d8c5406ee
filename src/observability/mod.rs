// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the dispatcher. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Give each run, admission and fault event one fixed wording
//! * Keep field names consistent between the text and the structured form of an event
//! * Let tests assert on the rendered text of an event
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - dispatcher run lifecycle and admission events
//! * `messages::task` - task execution faults
//! * `messages::config` - configuration loading events
//!
//! # Usage
//!
//! ```rust
//! use bounded_dispatcher::observability::messages::task::TaskFaulted;
//! use bounded_dispatcher::observability::messages::StructuredLog;
//!
//! let msg = TaskFaulted {
//!     index: 3,
//!     task: "resize_image",
//!     reason: "index out of bounds",
//! };
//!
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a `tracing-subscriber` fmt subscriber for the current process.
///
/// The filter is taken from `RUST_LOG` when present and falls back to
/// [`DEFAULT_LOG_FILTER`]. Calling this more than once is harmless: only the
/// first call installs a subscriber, later calls return `false`.
pub fn init_tracing() -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init_tracing();
        assert!(!init_tracing());
    }
}
