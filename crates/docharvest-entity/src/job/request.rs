//! Immutable job request handed to the task queue.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use docharvest_core::error::AppError;

use super::builder::build_job;
use super::kind::DocumentKind;

/// Inclusive calendar date range. `start <= end` once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Check whether a date falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One batch request: which identifiers, over which dates, which document
/// kinds, and where to store the results.
///
/// Only [`build_job`](super::builder::build_job) constructs a request, so every
/// instance has passed validation. Decoding re-runs the same rules. There are
/// no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodedJobRequest")]
pub struct JobRequest {
    identifiers: Vec<String>,
    date_range: DateRange,
    kinds: BTreeSet<DocumentKind>,
    destination: String,
}

impl JobRequest {
    pub(crate) fn new(
        identifiers: Vec<String>,
        date_range: DateRange,
        kinds: BTreeSet<DocumentKind>,
        destination: String,
    ) -> Self {
        Self {
            identifiers,
            date_range,
            kinds,
            destination,
        }
    }

    /// Identifiers in operator order. Duplicates are kept.
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Requested date range.
    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    /// Requested document kinds.
    pub fn kinds(&self) -> &BTreeSet<DocumentKind> {
        &self.kinds
    }

    /// Destination storage location name.
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

/// Wire form of a [`JobRequest`] before validation.
#[derive(Deserialize)]
struct EncodedJobRequest {
    identifiers: Vec<String>,
    date_range: DateRange,
    kinds: Vec<DocumentKind>,
    destination: String,
}

impl TryFrom<EncodedJobRequest> for JobRequest {
    type Error = AppError;

    fn try_from(raw: EncodedJobRequest) -> Result<Self, Self::Error> {
        build_job(
            &raw.identifiers.join("\n"),
            raw.date_range.start,
            raw.date_range.end,
            &raw.kinds,
            &raw.destination,
        )
    }
}
