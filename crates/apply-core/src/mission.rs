//! Mission domain: submission window, submission method, and derived status.
//!
//! Missions are owned by the persistence layer; this module only carries the
//! fields the judgment workflow reads.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecruitmentId(pub u64);

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MissionError {
    #[error("mission period starts after it ends: {start} > {end}")]
    InvalidPeriod {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    #[error("unknown submission method: {0}")]
    UnknownSubmissionMethod(String),
    #[error("unknown mission status: {0}")]
    UnknownStatus(String),
}

/// How an applicant hands in a mission.
///
/// Decides both the URL grammar the applicant must follow and which remote
/// endpoint the commit is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionMethod {
    PublicPullRequest,
    PrivateRepository,
}

impl SubmissionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublicPullRequest => "PUBLIC_PULL_REQUEST",
            Self::PrivateRepository => "PRIVATE_REPOSITORY",
        }
    }
}

impl fmt::Display for SubmissionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionMethod {
    type Err = MissionError;

    /// Accepts both `PUBLIC_PULL_REQUEST` and `public-pull-request` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PUBLIC_PULL_REQUEST" => Ok(Self::PublicPullRequest),
            "PRIVATE_REPOSITORY" => Ok(Self::PrivateRepository),
            _ => Err(MissionError::UnknownSubmissionMethod(s.to_string())),
        }
    }
}

/// Submission window of a mission. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionPeriod {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl MissionPeriod {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, MissionError> {
        if start > end {
            return Err(MissionError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, now: NaiveDateTime) -> bool {
        self.start <= now && now <= self.end
    }

    pub fn is_before(&self, now: NaiveDateTime) -> bool {
        now < self.start
    }

    pub fn is_after(&self, now: NaiveDateTime) -> bool {
        now > self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    Waiting,
    Submitting,
    Unsubmittable,
    Ended,
}

impl MissionStatus {
    /// Derive the status shown to applicants.
    ///
    /// A mission closed by a recruiter is `Unsubmittable` regardless of its
    /// window; otherwise the window alone decides.
    pub fn of(period: &MissionPeriod, submittable: bool, now: NaiveDateTime) -> Self {
        if !submittable {
            Self::Unsubmittable
        } else if period.is_before(now) {
            Self::Waiting
        } else if period.contains(now) {
            Self::Submitting
        } else {
            Self::Ended
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Submitting => "SUBMITTING",
            Self::Unsubmittable => "UNSUBMITTABLE",
            Self::Ended => "ENDED",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissionStatus {
    type Err = MissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WAITING" => Ok(Self::Waiting),
            "SUBMITTING" => Ok(Self::Submitting),
            "UNSUBMITTABLE" => Ok(Self::Unsubmittable),
            "ENDED" => Ok(Self::Ended),
            _ => Err(MissionError::UnknownStatus(s.to_string())),
        }
    }
}

/// A coding assignment within an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub title: String,
    pub description: String,
    pub period: MissionPeriod,
    pub submittable: bool,
    pub hidden: bool,
    pub submission_method: SubmissionMethod,
}

impl Mission {
    pub fn status(&self, now: NaiveDateTime) -> MissionStatus {
        MissionStatus::of(&self.period, self.submittable, now)
    }

    /// Commit-selection cutoff for this mission's submissions.
    pub fn deadline(&self) -> NaiveDateTime {
        self.period.end()
    }
}
