// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded-concurrency task dispatcher.
//!
//! Enqueue [`WorkItem`]s on a [`BoundedDispatcher`], then `run` it: items are
//! submitted in insertion order, no more than `capacity` execute at once, and
//! the run returns when every item has completed.

pub mod config;         // capacity configuration + builder
pub mod engine;         // dispatcher, work items
pub mod errors;         // error handling
pub mod observability;  // structured log messages
pub mod traits;         // task abstractions

pub use config::DispatcherBuilder;
pub use engine::{BoundedDispatcher, RunSummary, TaskArg, WorkItem};
pub use errors::{ConfigurationError, DispatchError};
pub use traits::{AsyncTask, Task};
