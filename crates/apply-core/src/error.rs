use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::mission::{MissionId, SubmissionMethod};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of commit resolution.
///
/// Every kind is raised where it is detected and reaches the caller
/// unchanged; nothing here is retried.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("url does not match the {} format: {url}", target_noun(*.method))]
    InvalidUrlFormat {
        method: SubmissionMethod,
        url: String,
    },

    #[error("remote API rejected the access token")]
    Unauthorized,

    #[error("remote API request quota reached")]
    RateLimited,

    #[error("{} does not exist: {url}", target_noun(*.method))]
    TargetNotFound {
        method: SubmissionMethod,
        url: String,
    },

    #[error("unexpected failure talking to the remote API: {message}")]
    RemoteUnavailable {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("no commit exists at or before {deadline}")]
    NoEligibleCommit { deadline: DateTime<FixedOffset> },
}

/// Coarse grouping of [`ArchiveError`] kinds for user-facing messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The applicant supplied something unusable.
    ClientInput,
    /// The configured token is wrong.
    Credentials,
    /// Upstream quota exhausted; may succeed later.
    Capacity,
    Unexpected,
}

impl ArchiveError {
    /// Wrap a transport or protocol failure, keeping it as the source.
    pub fn remote<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::RemoteUnavailable {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            Self::InvalidUrlFormat { .. }
            | Self::TargetNotFound { .. }
            | Self::NoEligibleCommit { .. } => FailureClass::ClientInput,
            Self::Unauthorized => FailureClass::Credentials,
            Self::RateLimited => FailureClass::Capacity,
            Self::RemoteUnavailable { .. } => FailureClass::Unexpected,
        }
    }
}

fn target_noun(method: SubmissionMethod) -> &'static str {
    match method {
        SubmissionMethod::PublicPullRequest => "pull request",
        SubmissionMethod::PrivateRepository => "repository",
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("mission not found: {0}")]
    MissionNotFound(MissionId),

    #[error("catalog backend failure: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
