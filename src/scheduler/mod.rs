//! Trigger compilation and background job execution.

pub mod compile;
pub mod engine;
pub mod types;

pub use compile::compile;
pub use engine::{Job, JobCallback, JobFuture, JobScheduler};
pub use types::{JobKind, Trigger, TriggerSpec};
