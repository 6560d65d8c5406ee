// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the dispatcher run lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Run start and completion
//! * Submission of individual work items
//! * The admission gate holding back submissions while at capacity

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A run started draining the backlog.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use bounded_dispatcher::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     item_count: 5,
///     capacity: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted {
    pub item_count: usize,
    pub capacity: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting dispatcher run: {} items, capacity={}",
            self.item_count, self.capacity
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            item_count = self.item_count,
            capacity = self.capacity,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch_run",
            span_name = name,
            item_count = self.item_count,
            capacity = self.capacity,
        )
    }
}

/// A run finished: every submitted item has completed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use bounded_dispatcher::observability::messages::engine::RunCompleted;
/// use std::time::Duration;
///
/// let msg = RunCompleted {
///     submitted: 5,
///     faulted: 0,
///     peak_active: 4,
///     duration: Duration::from_millis(250),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunCompleted {
    pub submitted: usize,
    pub faulted: usize,
    pub peak_active: usize,
    pub duration: Duration,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatcher run completed: {} items ({} faulted), peak_active={}, in {:?}",
            self.submitted, self.faulted, self.peak_active, self.duration
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            submitted = self.submitted,
            faulted = self.faulted,
            peak_active = self.peak_active,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch_run_completed",
            span_name = name,
            submitted = self.submitted,
            faulted = self.faulted,
            duration = ?self.duration,
        )
    }
}

/// A work item was handed to an execution slot.
///
/// # Log Level
/// `debug!` - Per-item detail
pub struct ItemSubmitted<'a> {
    pub index: usize,
    pub task: &'a str,
    pub active: usize,
}

impl Display for ItemSubmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Submitted item #{} '{}' (active={})",
            self.index, self.task, self.active
        )
    }
}

impl StructuredLog for ItemSubmitted<'_> {
    fn log(&self) {
        tracing::debug!(
            index = self.index,
            task = self.task,
            active = self.active,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "work_item",
            span_name = name,
            index = self.index,
            task = self.task,
        )
    }
}

/// The admission gate is full; the next submission waits for a completion.
///
/// # Log Level
/// `debug!` - Expected back-pressure, not a problem
pub struct AdmissionDeferred {
    pub index: usize,
    pub capacity: usize,
}

impl Display for AdmissionDeferred {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Item #{} waiting for capacity ({} items active)",
            self.index, self.capacity
        )
    }
}

impl StructuredLog for AdmissionDeferred {
    fn log(&self) {
        tracing::debug!(index = self.index, capacity = self.capacity, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "admission_deferred",
            span_name = name,
            index = self.index,
            capacity = self.capacity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_completed_reads_naturally() {
        let msg = RunCompleted {
            submitted: 3,
            faulted: 1,
            peak_active: 2,
            duration: Duration::from_millis(120),
        };
        assert_eq!(
            msg.to_string(),
            "Dispatcher run completed: 3 items (1 faulted), peak_active=2, in 120ms"
        );
    }

    #[test]
    fn item_submitted_includes_index_and_name() {
        let msg = ItemSubmitted {
            index: 7,
            task: "thumbnail",
            active: 3,
        };
        assert_eq!(msg.to_string(), "Submitted item #7 'thumbnail' (active=3)");
    }
}
