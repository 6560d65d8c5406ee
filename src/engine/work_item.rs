// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Work items: a task function bundled with the arguments it will be called with.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::traits::task::AsyncFn;
use crate::traits::{AsyncTask, Task};

/// A single type-erased task argument.
///
/// Arguments are reference counted, so cloning a `TaskArg` (or the argument
/// list of a [`WorkItem`]) never copies the underlying value.
#[derive(Clone)]
pub struct TaskArg {
    inner: Arc<dyn Any + Send + Sync>,
}

impl TaskArg {
    pub fn new(value: impl Any + Send + Sync) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Borrow the argument as `T`, or `None` if it holds a different type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }
}

impl fmt::Debug for TaskArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TaskArg(..)")
    }
}

/// Build a `Vec<TaskArg>` from a list of values.
///
/// ```
/// use bounded_dispatcher::task_args;
///
/// let args = task_args![1_u32, "two", String::from("three")];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[1].downcast_ref::<&str>(), Some(&"two"));
/// ```
#[macro_export]
macro_rules! task_args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$($crate::engine::TaskArg::new($arg)),*]
    };
}

#[derive(Clone)]
pub(crate) enum TaskKind {
    Blocking(Arc<dyn Task>),
    Async(Arc<dyn AsyncTask>),
}

/// An executable unit: a task function plus its ordered argument list.
///
/// A `WorkItem` is immutable once built. The dispatcher owns it from
/// [`add`](crate::engine::BoundedDispatcher::add) until it is handed to an
/// execution slot, where the task is invoked exactly once with these arguments.
///
/// # Example
/// ```
/// use bounded_dispatcher::engine::WorkItem;
/// use bounded_dispatcher::task_args;
///
/// let item = WorkItem::from_fn(
///     |args| {
///         let name = args[0].downcast_ref::<&str>().copied().unwrap_or("?");
///         println!("hello {name}");
///     },
///     task_args!["world"],
/// )
/// .with_label("greeter");
///
/// assert_eq!(item.name(), "greeter");
/// assert_eq!(item.args().len(), 1);
/// ```
#[derive(Clone)]
pub struct WorkItem {
    pub(crate) task: TaskKind,
    pub(crate) args: Arc<[TaskArg]>,
    label: Option<String>,
}

impl WorkItem {
    /// Wrap a blocking [`Task`] implementation.
    pub fn new<T: Task + 'static>(task: T, args: Vec<TaskArg>) -> Self {
        Self::from_task(Arc::new(task), args)
    }

    /// Share one blocking task function between several work items.
    pub fn from_task(task: Arc<dyn Task>, args: Vec<TaskArg>) -> Self {
        Self {
            task: TaskKind::Blocking(task),
            args: args.into(),
            label: None,
        }
    }

    /// Wrap a blocking closure.
    pub fn from_fn<F>(f: F, args: Vec<TaskArg>) -> Self
    where
        F: Fn(&[TaskArg]) + Send + Sync + 'static,
    {
        Self::new(f, args)
    }

    /// Wrap an [`AsyncTask`] implementation.
    pub fn new_async<T: AsyncTask + 'static>(task: T, args: Vec<TaskArg>) -> Self {
        Self::from_async_task(Arc::new(task), args)
    }

    pub fn from_async_task(task: Arc<dyn AsyncTask>, args: Vec<TaskArg>) -> Self {
        Self {
            task: TaskKind::Async(task),
            args: args.into(),
            label: None,
        }
    }

    /// Wrap a closure returning a future.
    pub fn from_async_fn<F, Fut>(f: F, args: Vec<TaskArg>) -> Self
    where
        F: Fn(Arc<[TaskArg]>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new_async(AsyncFn(f), args)
    }

    /// Attach a human-readable label used in log output instead of the task's type name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn args(&self) -> &[TaskArg] {
        &self.args
    }

    pub fn is_async(&self) -> bool {
        matches!(self.task, TaskKind::Async(_))
    }

    /// The label if one was set, otherwise the task's own name.
    pub fn name(&self) -> &str {
        match (&self.label, &self.task) {
            (Some(label), _) => label.as_str(),
            (None, TaskKind::Blocking(task)) => task.name(),
            (None, TaskKind::Async(task)) => task.name(),
        }
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("name", &self.name())
            .field("async", &self.is_async())
            .field("arg_count", &self.args.len())
            .finish()
    }
}
