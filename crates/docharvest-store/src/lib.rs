//! # docharvest-store
//!
//! Backends shared by the client and the worker pool:
//!
//! - the **result store**, a TTL-bounded key-value store holding one status
//!   snapshot and one task outcome per task handle
//! - the **task queue**, a FIFO of serialized task envelopes
//!
//! Each has two providers, selected at runtime from configuration:
//!
//! - **memory**: in-process, using [moka](https://crates.io/crates/moka) for
//!   the store and a notified `VecDeque` for the queue
//! - **redis**: Redis-backed using the [redis](https://crates.io/crates/redis) crate

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
pub mod queue;
#[cfg(feature = "redis-backend")]
pub mod redis;
pub mod results;

pub use provider::CacheManager;
pub use queue::{connect_queue, deadline_after};
pub use results::ResultStore;
