mod active_count;
pub mod dispatcher;
pub mod work_item;

pub use dispatcher::{BoundedDispatcher, RunSummary};
pub use work_item::{TaskArg, WorkItem};
