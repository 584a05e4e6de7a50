//! In-process result store and task queue.

pub mod queue;
pub mod store;

pub use queue::MemoryTaskQueue;
pub use store::MemoryCacheProvider;
