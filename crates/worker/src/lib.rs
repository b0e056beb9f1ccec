//! Worker primitives shared by the preference crates.
//!
//! Store forwarding and durable writes run as Tokio tasks tagged with a
//! [`TaskClass`]. Spawning works from synchronous code too: outside a runtime the
//! work lands on a small shared runtime owned by this crate.

mod class;
mod join_set;
mod retry;
mod spawn;

pub use class::TaskClass;
pub use join_set::WorkerJoinSet;
pub use retry::RetryPolicy;
pub use spawn::{spawn, spawn_blocking};
