//! Validation of raw operator input into a [`JobRequest`].

use std::collections::BTreeSet;

use chrono::NaiveDate;

use docharvest_core::error::AppError;
use docharvest_core::result::AppResult;

use super::kind::DocumentKind;
use super::request::{DateRange, JobRequest};

/// Build a job request from raw operator input.
///
/// `raw_identifiers` holds one identifier per line. Rules are checked in
/// order and the first failure is returned as a `Validation` error:
///
/// 1. `destination` is non-blank (`"missing destination"`)
/// 2. at least one kind is selected (`"missing document kinds"`)
/// 3. `start <= end` (`"invalid date range"`)
/// 4. at least one non-blank line remains after trimming (`"no identifiers"`)
///
/// Inputs are only borrowed. No network or storage access happens here.
pub fn build_job(
    raw_identifiers: &str,
    start: NaiveDate,
    end: NaiveDate,
    kinds: &[DocumentKind],
    destination: &str,
) -> AppResult<JobRequest> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(AppError::validation("missing destination"));
    }

    if kinds.is_empty() {
        return Err(AppError::validation("missing document kinds"));
    }

    if start > end {
        return Err(AppError::validation("invalid date range"));
    }

    let identifiers: Vec<String> = raw_identifiers
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if identifiers.is_empty() {
        return Err(AppError::validation("no identifiers"));
    }

    Ok(JobRequest::new(
        identifiers,
        DateRange { start, end },
        kinds.iter().copied().collect::<BTreeSet<_>>(),
        destination.to_string(),
    ))
}
