//! Shared value types.

pub mod id;
pub mod task;

pub use id::TaskHandle;
pub use task::TaskEnvelope;
