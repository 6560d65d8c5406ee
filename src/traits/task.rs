// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use crate::engine::TaskArg;

/// A blocking task function.
///
/// Implementations run on a dedicated blocking thread, so they are free to
/// sleep, perform synchronous I/O, or burn CPU. The dispatcher observes only
/// that `run` returned (or panicked); anything a task wants to report must go
/// through state the task itself owns.
pub trait Task: Send + Sync {
    fn run(&self, args: &[TaskArg]);

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Task for F
where
    F: Fn(&[TaskArg]) + Send + Sync,
{
    fn run(&self, args: &[TaskArg]) {
        self(args)
    }
}

/// An async task function, driven on the tokio runtime.
///
/// Async tasks share the admission gate with blocking tasks: an async item
/// occupies one unit of capacity from submission until its future completes.
#[async_trait]
pub trait AsyncTask: Send + Sync {
    async fn run(&self, args: Arc<[TaskArg]>);

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Adapter that lets a plain `Fn(Arc<[TaskArg]>) -> impl Future` act as an [`AsyncTask`].
pub(crate) struct AsyncFn<F>(pub(crate) F);

#[async_trait]
impl<F, Fut> AsyncTask for AsyncFn<F>
where
    F: Fn(Arc<[TaskArg]>) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn run(&self, args: Arc<[TaskArg]>) {
        (self.0)(args).await
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<F>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_args;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Summer {
        total: AtomicUsize,
    }

    impl Task for Summer {
        fn run(&self, args: &[TaskArg]) {
            for arg in args {
                if let Some(n) = arg.downcast_ref::<usize>() {
                    self.total.fetch_add(*n, Ordering::SeqCst);
                }
            }
        }

        fn name(&self) -> &'static str {
            "summer"
        }
    }

    #[test]
    fn closures_are_tasks() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let task = move |args: &[TaskArg]| {
            hits_clone.fetch_add(args.len(), Ordering::SeqCst);
        };

        Task::run(&task, &task_args![1_u8, "two", 3.0_f64]);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn custom_task_reads_typed_args() {
        let summer = Summer {
            total: AtomicUsize::new(0),
        };
        summer.run(&task_args![2_usize, "ignored", 5_usize]);
        assert_eq!(summer.total.load(Ordering::SeqCst), 7);
        assert_eq!(summer.name(), "summer");
    }

    #[tokio::test]
    async fn async_fn_adapter_forwards_args() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let task = AsyncFn(move |args: Arc<[TaskArg]>| {
            let seen = seen_clone.clone();
            async move {
                seen.fetch_add(args.len(), Ordering::SeqCst);
            }
        });

        let args: Arc<[TaskArg]> = task_args![1_i32, 2_i32].into();
        AsyncTask::run(&task, args).await;
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
