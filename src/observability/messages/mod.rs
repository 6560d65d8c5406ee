// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit the same event with typed fields at its
//! designated level.
//!
//! # Organization
//!
//! * `engine` - dispatcher run lifecycle and admission events
//! * `task` - task execution faults
//! * `config` - configuration loading events
//!
//! # Usage Pattern
//!
//! ```rust
//! use bounded_dispatcher::observability::messages::engine::RunStarted;
//! use bounded_dispatcher::observability::messages::StructuredLog;
//!
//! let msg = RunStarted {
//!     item_count: 5,
//!     capacity: 4,
//! };
//!
//! msg.log();
//! ```

pub mod config;
pub mod engine;
pub mod task;

use tracing::Span;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Create a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
