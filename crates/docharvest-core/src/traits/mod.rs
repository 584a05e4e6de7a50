//! Backend traits implemented by the store and queue providers.

pub mod cache;
pub mod queue;

pub use cache::CacheProvider;
pub use queue::TaskQueue;
