//! End-to-end tests: operator session, in-memory backends, and an
//! in-process worker pool.

mod helpers;
mod pipeline_test;
mod probe_test;
