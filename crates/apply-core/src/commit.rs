//! Commit values and the last-commit-before-deadline rule.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ArchiveError;

/// A commit handed to the judgment runner. Only the hash survives selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
}

impl Commit {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

/// Commit metadata as read from the remote API, before selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub committed_at: DateTime<FixedOffset>,
}

impl CommitRecord {
    pub fn new(hash: impl Into<String>, committed_at: DateTime<FixedOffset>) -> Self {
        Self {
            hash: hash.into(),
            committed_at,
        }
    }
}

/// Interpret a zone-naive deadline in an explicit offset.
///
/// Fixed offsets have no gaps or folds, so the mapping is always unique.
/// A deadline whose instant falls outside the representable range saturates
/// to the latest (or earliest) instant, expressed in UTC.
pub fn localize_deadline(deadline: NaiveDateTime, offset: FixedOffset) -> DateTime<FixedOffset> {
    let shift = TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    match deadline.checked_sub_signed(shift) {
        Some(utc) => offset.from_utc_datetime(&utc),
        None if shift < TimeDelta::zero() => Utc.fix().from_utc_datetime(&NaiveDateTime::MAX),
        None => Utc.fix().from_utc_datetime(&NaiveDateTime::MIN),
    }
}

/// Pick the most recent commit at or before `deadline`.
///
/// Records may arrive in any order. Comparison is by instant, so records
/// carrying different offsets compare correctly. When several eligible
/// records share the latest instant, which one wins is unspecified.
pub fn select_last(
    records: &[CommitRecord],
    deadline: DateTime<FixedOffset>,
) -> Result<Commit, ArchiveError> {
    records
        .iter()
        .filter(|r| r.committed_at <= deadline)
        .max_by_key(|r| r.committed_at)
        .map(|r| Commit::new(r.hash.clone()))
        .ok_or(ArchiveError::NoEligibleCommit { deadline })
}
