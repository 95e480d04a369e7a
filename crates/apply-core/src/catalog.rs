//! Read-only view of mission and assignment persistence.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::CatalogError;
use crate::judgment::LastJudgment;
use crate::mission::{Mission, MissionId, RecruitmentId, SubmissionMethod, UserId};

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[async_trait]
pub trait MissionCatalog: Send + Sync {
    /// Missions of every evaluation in `recruitment` that `user` is a target of,
    /// hidden ones included.
    async fn missions_for(
        &self,
        user: UserId,
        recruitment: RecruitmentId,
    ) -> CatalogResult<Vec<Mission>>;

    async fn mission(&self, id: MissionId) -> CatalogResult<Mission>;

    /// Whether at least one auto-judgment item is attached to the mission.
    async fn has_auto_judgment_config(&self, id: MissionId) -> CatalogResult<bool>;

    /// Whether `user` has an assignment recorded for the mission.
    async fn has_submission(&self, user: UserId, id: MissionId) -> CatalogResult<bool>;

    async fn last_judgment(
        &self,
        user: UserId,
        id: MissionId,
    ) -> CatalogResult<Option<LastJudgment>>;

    async fn mission_deadline(&self, id: MissionId) -> CatalogResult<NaiveDateTime> {
        Ok(self.mission(id).await?.deadline())
    }

    async fn mission_submission_method(&self, id: MissionId) -> CatalogResult<SubmissionMethod> {
        Ok(self.mission(id).await?.submission_method)
    }
}
