//! Redis result store and task queue.

pub mod client;
pub mod operations;
pub mod queue;

pub use client::RedisClient;
pub use operations::RedisCacheProvider;
pub use queue::RedisTaskQueue;
