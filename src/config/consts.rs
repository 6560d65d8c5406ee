/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 10;
/// Largest accepted capacity: tokio's default blocking pool size, so that every
/// admitted blocking item has a thread to run on
pub const MAX_CAPACITY: usize = 512;
