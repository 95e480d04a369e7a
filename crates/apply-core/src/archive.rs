use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::commit::Commit;
use crate::error::ArchiveError;
use crate::mission::SubmissionMethod;

/// Where submitted work lives.
///
/// The judgment workflow depends only on this contract; the GitHub client
/// and the test double both implement it.
#[async_trait]
pub trait AssignmentArchive: Send + Sync {
    /// Resolve the last commit made at or before `deadline` for the
    /// submission at `url`.
    ///
    /// `deadline` is zone-naive; implementations interpret it in an
    /// explicitly configured offset. Resolution is all-or-nothing.
    async fn resolve_commit(
        &self,
        method: SubmissionMethod,
        url: &str,
        deadline: NaiveDateTime,
    ) -> Result<Commit, ArchiveError>;
}

#[async_trait]
impl<T: AssignmentArchive + ?Sized> AssignmentArchive for std::sync::Arc<T> {
    async fn resolve_commit(
        &self,
        method: SubmissionMethod,
        url: &str,
        deadline: NaiveDateTime,
    ) -> Result<Commit, ArchiveError> {
        (**self).resolve_commit(method, url, deadline).await
    }
}
