//! Key builders for every entry DocHarvest writes.
//!
//! Keys are relative; providers prepend the configured prefix.

use docharvest_core::types::TaskHandle;

/// Key of the latest status snapshot of a task.
pub fn task_status(handle: TaskHandle) -> String {
    format!("status:{handle}")
}

/// Key of the raw outcome (return value or error) of a task.
pub fn task_result(handle: TaskHandle) -> String {
    format!("result:{handle}")
}

/// Key of the list backing a named queue.
pub fn queue(name: &str) -> String {
    format!("queue:{name}")
}
