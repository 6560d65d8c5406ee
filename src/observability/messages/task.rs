// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for task execution faults.
//!
//! Task functions have no error channel. The only thing the dispatcher can
//! observe is abnormal termination, which is reported here.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A task function panicked or was cancelled before returning.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use bounded_dispatcher::observability::messages::task::TaskFaulted;
///
/// let msg = TaskFaulted {
///     index: 2,
///     task: "upload_chunk",
///     reason: "connection reset",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct TaskFaulted<'a> {
    pub index: usize,
    pub task: &'a str,
    pub reason: &'a str,
}

impl Display for TaskFaulted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' (item #{}) terminated abnormally: {}",
            self.task, self.index, self.reason
        )
    }
}

impl StructuredLog for TaskFaulted<'_> {
    fn log(&self) {
        tracing::error!(
            index = self.index,
            task = self.task,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "task_faulted",
            span_name = name,
            index = self.index,
            task = self.task,
        )
    }
}

/// A submitted item was cancelled before its task function could finish.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use bounded_dispatcher::observability::messages::task::TaskCancelled;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Interrupted, "runtime shutting down");
/// let msg = TaskCancelled { error: &error };
///
/// tracing::error!("{}", msg);
/// ```
pub struct TaskCancelled<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for TaskCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Work item did not run to completion: {}", self.error)
    }
}

impl StructuredLog for TaskCancelled<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("task_cancelled", span_name = name, error = %self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_message_names_task_and_reason() {
        let msg = TaskFaulted {
            index: 4,
            task: "resize",
            reason: "out of memory",
        };
        assert_eq!(
            msg.to_string(),
            "Task 'resize' (item #4) terminated abnormally: out of memory"
        );
    }

    #[test]
    fn cancellation_message_carries_the_cause() {
        let error = std::io::Error::new(std::io::ErrorKind::Interrupted, "runtime shutting down");
        let msg = TaskCancelled { error: &error };
        assert_eq!(
            msg.to_string(),
            "Work item did not run to completion: runtime shutting down"
        );
    }
}
