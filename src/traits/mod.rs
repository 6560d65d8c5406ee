pub mod task;

pub use task::{AsyncTask, Task};
