// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::ConfigurationError;

/// Errors returned by [`BoundedDispatcher::run`](crate::engine::BoundedDispatcher::run)
/// and its blocking counterpart.
///
/// Faults inside task functions are deliberately absent: they are logged and
/// counted in the run summary, never propagated.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The runtime backing `run_blocking` could not be created
    #[error("failed to start dispatcher runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// `run_blocking` was called from within an async runtime
    #[error("run_blocking cannot be called from within an async runtime; await run() instead")]
    NestedRuntime,
}
