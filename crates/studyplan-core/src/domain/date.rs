//! Calendar dates for scheduled tasks.
//!
//! Dates are kept in their canonical zero-padded `YYYY-MM-DD` text form and
//! compared as strings. Ordering by the string is only equal to ordering by
//! date because the form is fixed width, so every constructor that produces a
//! new date goes through `%Y-%m-%d` formatting.
//!
//! Rows read back from the store are wrapped verbatim (`TaskDate::raw`): a
//! corrupt value still sorts lexicographically and never matches a real day.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const CANONICAL_FORMAT: &str = "%Y-%m-%d";
const CANONICAL_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("date '{0}' is not in YYYY-MM-DD form")]
    NotCanonical(String),

    #[error("date '{0}' is not a valid calendar day")]
    InvalidDay(String),
}

/// Scheduled day of a task (no time component).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDate(String);

impl TaskDate {
    /// Parse user input, accepting only the canonical form.
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let trimmed = input.trim();
        if !has_canonical_shape(trimmed) {
            return Err(DateError::NotCanonical(trimmed.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, CANONICAL_FORMAT)
            .map_err(|_| DateError::InvalidDay(trimmed.to_string()))?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date.format(CANONICAL_FORMAT).to_string())
    }

    /// Wrap a stored value without validation.
    pub fn raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_canonical(&self) -> bool {
        has_canonical_shape(&self.0)
            && NaiveDate::parse_from_str(&self.0, CANONICAL_FORMAT).is_ok()
    }

    pub fn to_naive(&self) -> Option<NaiveDate> {
        if !has_canonical_shape(&self.0) {
            return None;
        }
        NaiveDate::parse_from_str(&self.0, CANONICAL_FORMAT).ok()
    }
}

impl fmt::Display for TaskDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NaiveDate> for TaskDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_naive(date)
    }
}

/// `dddd-dd-dd`. chrono alone would also accept `2024-3-5`.
fn has_canonical_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == CANONICAL_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
