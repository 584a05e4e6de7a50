//! # docharvest-core
//!
//! Core crate for DocHarvest. Contains the backend traits (task queue and
//! result cache), configuration schemas, typed identifiers, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other DocHarvest crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
