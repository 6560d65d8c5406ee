// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded-concurrency dispatcher.
//!
//! Callers fill a backlog with [`WorkItem`]s and then drive it to completion
//! with a single [`run`](BoundedDispatcher::run). Items are submitted in
//! insertion order, at most `capacity` of them execute at any instant, and the
//! run returns only once every submitted item has finished.
//!
//! # Concurrency Control
//!
//! - **Admission gate**: a `tokio::sync::Semaphore` with `capacity` permits. A permit
//!   is acquired before each submission, so the walk over the backlog suspends
//!   (without polling) while the dispatcher is full.
//! - **Active count**: an atomic counter incremented on submission and decremented by
//!   the drop of the item's slot guard, before its permit is returned. The count
//!   therefore never exceeds `capacity`.
//! - **Drain**: every submission lives in a `JoinSet`; the run awaits all of them.
//!
//! # Task Faults
//!
//! Task functions have no error channel. A panic is caught at the task boundary,
//! logged with the item's index and name, and counted in the [`RunSummary`];
//! it is never re-raised and never stalls the run.
//!
//! # Reuse
//!
//! `run` takes the backlog out of the dispatcher. Afterwards the backlog is
//! empty and new items can be added for another run; running again without
//! adding anything submits nothing.

use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

use crate::config::consts::{DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::config::DispatcherBuilder;
use crate::engine::active_count::{ActiveCount, ActiveSlot};
use crate::engine::work_item::{TaskKind, WorkItem};
use crate::errors::{ConfigurationError, DispatchError};
use crate::observability::messages::engine::{
    AdmissionDeferred, ItemSubmitted, RunCompleted, RunStarted,
};
use crate::observability::messages::task::{TaskCancelled, TaskFaulted};
use crate::observability::messages::StructuredLog;
use crate::traits::{AsyncTask, Task};

/// Dispatcher that runs a backlog of work items with at most `capacity` in flight.
///
/// `add` and `run` both take `&mut self`, so items cannot be enqueued while a
/// run is walking the backlog.
///
/// # Example
/// ```
/// use bounded_dispatcher::engine::{BoundedDispatcher, WorkItem};
/// use bounded_dispatcher::task_args;
/// use std::sync::{Arc, Mutex};
///
/// # #[tokio::main]
/// # async fn main() {
/// let results = Arc::new(Mutex::new(Vec::new()));
/// let mut dispatcher = BoundedDispatcher::with_capacity(2).unwrap();
///
/// for n in 0..5_u32 {
///     let results = results.clone();
///     dispatcher.add(WorkItem::from_fn(
///         move |args| {
///             let n = *args[0].downcast_ref::<u32>().unwrap();
///             results.lock().unwrap().push(n * n);
///         },
///         task_args![n],
///     ));
/// }
///
/// let summary = dispatcher.run().await;
/// assert_eq!(summary.submitted, 5);
/// assert!(summary.peak_active <= 2);
///
/// let mut squares = results.lock().unwrap().clone();
/// squares.sort();
/// assert_eq!(squares, vec![0, 1, 4, 9, 16]);
/// # }
/// ```
pub struct BoundedDispatcher {
    /// Maximum number of concurrently executing work items
    capacity: NonZeroUsize,
    /// Items waiting for the next run, in submission order
    backlog: Vec<WorkItem>,
    active: ActiveCount,
}

/// Counts describing a finished run.
///
/// Carries no task output: tasks report results through their own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Items submitted, which is every item in the backlog at the start of the run
    pub submitted: usize,
    /// Items whose task function panicked or was cancelled
    pub faulted: usize,
    /// Highest number of items executing at once during the run
    pub peak_active: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Items whose task function returned normally.
    pub fn completed(&self) -> usize {
        self.submitted - self.faulted
    }
}

/// What a finished task reports back to the drain loop.
struct Completion {
    index: usize,
    name: String,
    fault: Option<String>,
}

#[derive(Default)]
struct Tally {
    faulted: usize,
}

impl Tally {
    fn record(&mut self, joined: Result<Completion, JoinError>) {
        match joined {
            Ok(Completion { fault: None, .. }) => {}
            Ok(Completion {
                index,
                name,
                fault: Some(reason),
            }) => {
                self.faulted += 1;
                TaskFaulted {
                    index,
                    task: &name,
                    reason: &reason,
                }
                .log();
            }
            Err(join_error) => {
                // panics are caught inside the task, so only cancellation lands here
                self.faulted += 1;
                TaskCancelled { error: &join_error }.log();
            }
        }
    }
}

impl Default for BoundedDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundedDispatcher {
    /// Create a dispatcher with the default capacity of 10.
    pub fn new() -> Self {
        Self::from_capacity(
            NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        )
    }

    /// Create a dispatcher admitting at most `capacity` concurrent items.
    ///
    /// Fails with [`ConfigurationError::ZeroCapacity`] for a capacity of zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigurationError> {
        Self::builder().capacity(capacity).build()
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub(crate) fn from_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            backlog: Vec::new(),
            active: ActiveCount::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Append a work item to the backlog.
    pub fn add(&mut self, item: WorkItem) {
        self.backlog.push(item);
    }

    /// Number of items waiting for the next run.
    pub fn pending(&self) -> usize {
        self.backlog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backlog.is_empty()
    }

    /// Number of items currently executing. Always 0 outside of a run.
    pub fn active_count(&self) -> usize {
        self.active.get()
    }

    /// Execute every backlog item, at most `capacity` at a time, and wait for all of them.
    ///
    /// Items are submitted in the order they were added; completion order is
    /// unspecified. Blocking task functions run on tokio's blocking pool and
    /// async ones on the current runtime. Capacity is capped at
    /// [`MAX_CAPACITY`], tokio's default blocking pool size, so every admitted
    /// blocking item has a thread; a runtime built with a smaller
    /// `max_blocking_threads` must be paired with a capacity no larger than it.
    pub async fn run(&mut self) -> RunSummary {
        let backlog = std::mem::take(&mut self.backlog);
        let started = RunStarted {
            item_count: backlog.len(),
            capacity: self.capacity.get(),
        };
        let span = started.span("run");

        async move {
            started.log();
            self.dispatch(backlog).await
        }
        .instrument(span)
        .await
    }

    /// Blocking flavour of [`run`](Self::run) for callers outside an async runtime.
    ///
    /// Starts a private multi-threaded runtime for the duration of the run, with
    /// enough blocking threads for a full wave at the largest allowed capacity.
    /// Returns [`DispatchError::NestedRuntime`] when called from inside a runtime.
    pub fn run_blocking(&mut self) -> Result<RunSummary, DispatchError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(DispatchError::NestedRuntime);
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .max_blocking_threads(MAX_CAPACITY)
            .enable_all()
            .build()
            .map_err(DispatchError::Runtime)?;

        Ok(runtime.block_on(self.run()))
    }

    async fn dispatch(&self, backlog: Vec<WorkItem>) -> RunSummary {
        let started_at = Instant::now();
        let capacity = self.capacity.get();
        let gate = Arc::new(Semaphore::new(capacity));
        let mut in_flight = JoinSet::new();
        let mut tally = Tally::default();
        let mut submitted = 0;

        self.active.reset_peak();

        for (index, item) in backlog.into_iter().enumerate() {
            if gate.available_permits() == 0 {
                AdmissionDeferred { index, capacity }.log();
            }

            // Wait for capacity, reaping finished items while we do so that
            // faults are reported as they happen rather than at the end.
            let permit = loop {
                tokio::select! {
                    biased;
                    permit = gate.clone().acquire_owned() => break permit,
                    Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                        tally.record(joined);
                    }
                }
            };

            let Ok(permit) = permit else {
                unreachable!("admission gate is owned by this run and never closed");
            };

            let slot = self.active.occupy(permit);
            ItemSubmitted {
                index,
                task: item.name(),
                active: self.active.get(),
            }
            .log();
            submit(&mut in_flight, index, item, slot);
            submitted += 1;
        }

        while let Some(joined) = in_flight.join_next().await {
            tally.record(joined);
        }
        debug_assert_eq!(self.active.get(), 0, "all slots released after drain");

        let summary = RunSummary {
            submitted,
            faulted: tally.faulted,
            peak_active: self.active.peak(),
            elapsed: started_at.elapsed(),
        };

        RunCompleted {
            submitted: summary.submitted,
            faulted: summary.faulted,
            peak_active: summary.peak_active,
            duration: summary.elapsed,
        }
        .log();

        summary
    }
}

/// Hand one item to an execution slot.
///
/// The slot moves into the spawned task and is dropped when the task function
/// returns or panics, which is the item's completion signal.
fn submit(in_flight: &mut JoinSet<Completion>, index: usize, item: WorkItem, slot: ActiveSlot) {
    let name = item.name().to_owned();
    let args = item.args;

    match item.task {
        TaskKind::Blocking(task) => {
            in_flight.spawn_blocking(move || {
                let _slot = slot;
                let fault = std::panic::catch_unwind(AssertUnwindSafe(|| task.run(&args)))
                    .err()
                    .map(|payload| panic_message(payload.as_ref()));
                Completion { index, name, fault }
            });
        }
        TaskKind::Async(task) => {
            in_flight.spawn(async move {
                let _slot = slot;
                let fault = AssertUnwindSafe(task.run(args))
                    .catch_unwind()
                    .await
                    .err()
                    .map(|payload| panic_message(payload.as_ref()));
                Completion { index, name, fault }
            });
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

impl std::fmt::Debug for BoundedDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedDispatcher")
            .field("capacity", &self.capacity)
            .field("pending", &self.backlog.len())
            .field("active", &self.active.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_args;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn counting_item(counter: &Arc<AtomicUsize>) -> WorkItem {
        let counter = counter.clone();
        WorkItem::from_fn(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            vec![],
        )
    }

    #[test]
    fn new_dispatcher_is_empty_with_default_capacity() {
        let dispatcher = BoundedDispatcher::new();
        assert_eq!(dispatcher.capacity(), 10);
        assert_eq!(dispatcher.pending(), 0);
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.active_count(), 0);
    }

    #[test]
    fn with_capacity_rejects_zero() {
        assert!(matches!(
            BoundedDispatcher::with_capacity(0),
            Err(ConfigurationError::ZeroCapacity)
        ));
        assert_eq!(BoundedDispatcher::with_capacity(3).unwrap().capacity(), 3);
    }

    #[test]
    fn add_preserves_backlog_length() {
        let mut dispatcher = BoundedDispatcher::new();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..4 {
            dispatcher.add(counting_item(&counter));
        }
        assert_eq!(dispatcher.pending(), 4);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn run_invokes_each_item_with_its_own_args() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = BoundedDispatcher::with_capacity(3).unwrap();

        for word in ["alpha", "beta", "gamma", "delta"] {
            let seen = seen.clone();
            dispatcher.add(WorkItem::from_fn(
                move |args| {
                    let word = args[0].downcast_ref::<&str>().unwrap();
                    let repeat = args[1].downcast_ref::<usize>().unwrap();
                    seen.lock().unwrap().push(word.repeat(*repeat));
                },
                task_args![word, 2_usize],
            ));
        }

        let summary = dispatcher.run().await;
        assert_eq!(summary.submitted, 4);
        assert_eq!(summary.faulted, 0);
        assert_eq!(summary.completed(), 4);

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec!["alphaalpha", "betabeta", "deltadelta", "gammagamma"]);
    }

    #[tokio::test]
    async fn submission_follows_insertion_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = BoundedDispatcher::with_capacity(1).unwrap();

        for n in 0..6_usize {
            let order = order.clone();
            dispatcher.add(WorkItem::from_fn(
                move |_| order.lock().unwrap().push(n),
                vec![],
            ));
        }

        dispatcher.run().await;
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn run_drains_backlog_and_allows_reuse() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = BoundedDispatcher::with_capacity(2).unwrap();
        dispatcher.add(counting_item(&counter));
        dispatcher.add(counting_item(&counter));

        let first = dispatcher.run().await;
        assert_eq!(first.submitted, 2);
        assert!(dispatcher.is_empty());

        let again = dispatcher.run().await;
        assert_eq!(again.submitted, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        dispatcher.add(counting_item(&counter));
        let third = dispatcher.run().await;
        assert_eq!(third.submitted, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn run_blocking_refuses_nested_runtime() {
        let mut dispatcher = BoundedDispatcher::new();
        assert!(matches!(
            dispatcher.run_blocking(),
            Err(DispatchError::NestedRuntime)
        ));
    }

    #[test]
    fn run_blocking_outside_runtime() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = BoundedDispatcher::with_capacity(2).unwrap();
        for _ in 0..5 {
            dispatcher.add(counting_item(&counter));
        }

        let summary = dispatcher.run_blocking().unwrap();
        assert_eq!(summary.submitted, 5);
        assert_eq!(counter.load(Ordering::SeqCst), 5);
        assert_eq!(dispatcher.active_count(), 0);
    }

    #[test]
    fn panic_message_handles_common_payloads() {
        let static_str: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let other: Box<dyn Any + Send> = Box::new(17_u8);

        assert_eq!(panic_message(static_str.as_ref()), "boom");
        assert_eq!(panic_message(owned.as_ref()), "bang");
        assert_eq!(panic_message(other.as_ref()), "panic with non-string payload");
    }

    #[test]
    fn debug_shows_capacity_and_pending() {
        let mut dispatcher = BoundedDispatcher::with_capacity(4).unwrap();
        dispatcher.add(WorkItem::from_fn(|_| {}, vec![]));
        let rendered = format!("{:?}", dispatcher);
        assert!(rendered.contains("capacity: 4"));
        assert!(rendered.contains("pending: 1"));
    }
}
