//! Applicant-facing mission queries and the commit hand-off to judgment.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::archive::AssignmentArchive;
use crate::catalog::MissionCatalog;
use crate::commit::Commit;
use crate::error::ServiceError;
use crate::judgment::{MyMission, evaluate};
use crate::mission::{MissionId, RecruitmentId, UserId};

pub struct MyMissionService<C, A> {
    catalog: C,
    archive: A,
}

impl<C: MissionCatalog, A: AssignmentArchive> MyMissionService<C, A> {
    pub fn new(catalog: C, archive: A) -> Self {
        Self { catalog, archive }
    }

    /// Every visible mission of the recruitment, as seen by `user` at `now`.
    pub async fn find_all(
        &self,
        user: UserId,
        recruitment: RecruitmentId,
        now: NaiveDateTime,
    ) -> Result<Vec<MyMission>, ServiceError> {
        let missions = self.catalog.missions_for(user, recruitment).await?;
        let mut views = Vec::with_capacity(missions.len());
        for mission in missions.iter().filter(|m| !m.hidden) {
            let testable = self.catalog.has_auto_judgment_config(mission.id).await?;
            let submitted = self.catalog.has_submission(user, mission.id).await?;
            let judgment = self.catalog.last_judgment(user, mission.id).await?;
            views.push(MyMission::new(
                mission,
                evaluate(mission, testable, submitted),
                judgment,
                now,
            ));
        }
        debug!(user = %user, total = missions.len(), visible = views.len(), "listed missions");
        Ok(views)
    }

    /// Resolve the commit an applicant's submission is judged against.
    ///
    /// The mission's submission method and deadline come from the catalog;
    /// archive failures reach the caller unchanged.
    pub async fn resolve_submission_commit(
        &self,
        mission: MissionId,
        url: &str,
    ) -> Result<Commit, ServiceError> {
        let method = self.catalog.mission_submission_method(mission).await?;
        let deadline = self.catalog.mission_deadline(mission).await?;
        let commit = self.archive.resolve_commit(method, url, deadline).await?;
        info!(mission = %mission, commit = %commit.hash, "resolved submission commit");
        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::CommitRecord;
    use crate::error::{ArchiveError, CatalogError};
    use crate::fakes::{MemoryMissionCatalog, StubArchive};
    use crate::judgment::{JudgmentStatus, LastJudgment};
    use crate::mission::{Mission, MissionPeriod, MissionStatus, SubmissionMethod};
    use chrono::{DateTime, NaiveDate};

    const USER: UserId = UserId(1);
    const RECRUITMENT: RecruitmentId = RecruitmentId(10);
    const PR_URL: &str = "https://github.com/woowacourse/service-apply/pull/367";

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 10, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn mission(id: u64, hidden: bool) -> Mission {
        Mission {
            id: MissionId(id),
            title: format!("mission {id}"),
            description: "description".into(),
            period: MissionPeriod::new(at(1), at(11)).unwrap(),
            submittable: true,
            hidden,
            submission_method: SubmissionMethod::PublicPullRequest,
        }
    }

    fn record(hash: &str, ts: &str) -> CommitRecord {
        CommitRecord::new(hash, DateTime::parse_from_rfc3339(ts).unwrap())
    }

    #[tokio::test]
    async fn hidden_missions_are_skipped() {
        let catalog = MemoryMissionCatalog::new();
        catalog.add_mission(RECRUITMENT, mission(1, false));
        catalog.add_mission(RECRUITMENT, mission(2, true));
        let service = MyMissionService::new(catalog, StubArchive::new());

        let views = service.find_all(USER, RECRUITMENT, at(5)).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, MissionId(1));
    }

    #[tokio::test]
    async fn testable_without_submission() {
        let catalog = MemoryMissionCatalog::new();
        catalog.add_mission(RECRUITMENT, mission(1, false));
        catalog.add_judgment_item(MissionId(1));
        let service = MyMissionService::new(catalog, StubArchive::new());

        let views = service.find_all(USER, RECRUITMENT, at(5)).await.unwrap();
        assert!(views[0].testable);
        assert!(!views[0].submitted);
        assert!(!views[0].runnable);
    }

    #[tokio::test]
    async fn submitted_without_judgment_item() {
        let catalog = MemoryMissionCatalog::new();
        catalog.add_mission(RECRUITMENT, mission(1, false));
        catalog.add_assignment(USER, MissionId(1));
        let service = MyMissionService::new(catalog, StubArchive::new());

        let views = service.find_all(USER, RECRUITMENT, at(5)).await.unwrap();
        assert!(!views[0].testable);
        assert!(views[0].submitted);
    }

    #[tokio::test]
    async fn another_users_assignment_does_not_count() {
        let catalog = MemoryMissionCatalog::new();
        catalog.add_mission(RECRUITMENT, mission(1, false));
        catalog.add_judgment_item(MissionId(1));
        catalog.add_assignment(UserId(2), MissionId(1));
        let service = MyMissionService::new(catalog, StubArchive::new());

        let views = service.find_all(USER, RECRUITMENT, at(5)).await.unwrap();
        assert!(!views[0].submitted);
    }

    #[tokio::test]
    async fn runnable_only_while_submitting() {
        let catalog = MemoryMissionCatalog::new();
        catalog.add_mission(RECRUITMENT, mission(1, false));
        catalog.add_judgment_item(MissionId(1));
        catalog.add_assignment(USER, MissionId(1));
        catalog.set_last_judgment(
            USER,
            MissionId(1),
            LastJudgment {
                url: PR_URL.into(),
                commit_hash: "8c2d61313838d9220848bd38a5a5adc34efc5169".into(),
                status: JudgmentStatus::Succeeded,
                pass_count: 3,
                total_count: 4,
                started_at: at(5),
            },
        );
        let service = MyMissionService::new(catalog, StubArchive::new());

        let open = service.find_all(USER, RECRUITMENT, at(5)).await.unwrap();
        assert_eq!(open[0].status, MissionStatus::Submitting);
        assert!(open[0].runnable);
        assert_eq!(open[0].judgment.as_ref().unwrap().summary(), "3/4 passed");

        let closed = service.find_all(USER, RECRUITMENT, at(20)).await.unwrap();
        assert_eq!(closed[0].status, MissionStatus::Ended);
        assert!(!closed[0].runnable);
    }

    #[tokio::test]
    async fn resolves_with_mission_deadline() {
        let catalog = MemoryMissionCatalog::new();
        catalog.add_mission(RECRUITMENT, mission(1, false));
        let archive = StubArchive::new();
        archive.set_records(
            PR_URL,
            vec![
                record("before", "2021-10-10T00:00:00Z"),
                record("after", "2021-10-12T00:00:00Z"),
            ],
        );
        let service = MyMissionService::new(catalog, archive);

        let commit = service
            .resolve_submission_commit(MissionId(1), PR_URL)
            .await
            .unwrap();
        assert_eq!(commit, Commit::new("before"));
    }

    #[tokio::test]
    async fn archive_failures_pass_through() {
        let catalog = MemoryMissionCatalog::new();
        catalog.add_mission(RECRUITMENT, mission(1, false));
        let service = MyMissionService::new(catalog, StubArchive::new());

        let err = service
            .resolve_submission_commit(MissionId(1), "https://github.com/o/r")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Archive(ArchiveError::InvalidUrlFormat { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_mission() {
        let service = MyMissionService::new(MemoryMissionCatalog::new(), StubArchive::new());
        let err = service
            .resolve_submission_commit(MissionId(99), PR_URL)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Catalog(CatalogError::MissionNotFound(MissionId(99)))
        ));
    }

    #[tokio::test]
    async fn catalog_outage_surfaces_as_catalog_error() {
        let catalog = MemoryMissionCatalog::new();
        catalog.add_mission(RECRUITMENT, mission(1, false));
        catalog.fail_backend("database unavailable");
        let archive = std::sync::Arc::new(StubArchive::new());
        let service = MyMissionService::new(catalog, std::sync::Arc::clone(&archive));

        let err = service.find_all(USER, RECRUITMENT, at(5)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Catalog(CatalogError::Backend(_))));

        let err = service
            .resolve_submission_commit(MissionId(1), PR_URL)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Catalog(CatalogError::Backend(_))));
        assert_eq!(archive.calls(), 0);
    }
}
