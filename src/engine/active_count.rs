// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OwnedSemaphorePermit;

/// Live count of work items currently executing.
///
/// Every mutation goes through the same atomic read-modify-write, on both the
/// increment path ([`occupy`](Self::occupy)) and the decrement path
/// ([`ActiveSlot`]'s `Drop`). A high-water mark is kept alongside for reporting.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActiveCount {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ActiveCount {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    pub(crate) fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    /// Forget the high-water mark of a previous run.
    pub(crate) fn reset_peak(&self) {
        self.inner.peak.store(self.get(), Ordering::SeqCst);
    }

    /// Count one more executing item for as long as the returned slot lives.
    ///
    /// The slot owns the admission permit so that capacity is handed back only
    /// after the count has been decremented.
    pub(crate) fn occupy(&self, permit: OwnedSemaphorePermit) -> ActiveSlot {
        let now = self.inner.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(now, Ordering::SeqCst);
        ActiveSlot {
            counters: self.inner.clone(),
            _permit: permit,
        }
    }
}

/// Completion signal for one executing item.
///
/// Dropping the slot decrements the active count exactly once, then releases
/// the admission permit. Drop runs on normal return and during unwinding alike.
#[derive(Debug)]
pub(crate) struct ActiveSlot {
    counters: Arc<Counters>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        // fields (and with them the permit) are dropped after this body
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Semaphore;

    #[tokio::test]
    async fn slot_tracks_count_and_releases_permit_after_decrement() {
        let gate = Arc::new(Semaphore::new(2));
        let count = ActiveCount::new();

        let first = count.occupy(gate.clone().acquire_owned().await.unwrap());
        let second = count.occupy(gate.clone().acquire_owned().await.unwrap());
        assert_eq!(count.get(), 2);
        assert_eq!(gate.available_permits(), 0);

        drop(first);
        assert_eq!(count.get(), 1);
        assert_eq!(gate.available_permits(), 1);

        drop(second);
        assert_eq!(count.get(), 0);
        assert_eq!(gate.available_permits(), 2);
        assert_eq!(count.peak(), 2);
    }

    #[tokio::test]
    async fn slot_is_released_when_holder_panics() {
        let gate = Arc::new(Semaphore::new(1));
        let count = ActiveCount::new();
        let slot = count.occupy(gate.clone().acquire_owned().await.unwrap());

        let outcome = std::thread::spawn(move || {
            let _slot = slot;
            panic!("task blew up");
        })
        .join();

        assert!(outcome.is_err());
        assert_eq!(count.get(), 0);
        assert_eq!(gate.available_permits(), 1);
    }

    #[tokio::test]
    async fn reset_peak_starts_from_current_level() {
        let gate = Arc::new(Semaphore::new(3));
        let count = ActiveCount::new();
        let a = count.occupy(gate.clone().acquire_owned().await.unwrap());
        let b = count.occupy(gate.clone().acquire_owned().await.unwrap());
        drop(b);
        assert_eq!(count.peak(), 2);

        count.reset_peak();
        assert_eq!(count.peak(), 1);
        drop(a);
    }
}
