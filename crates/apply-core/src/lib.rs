//! Core types for mission judgment: commit selection, submission URL grammar,
//! and applicant eligibility.

pub mod archive;
pub mod catalog;
pub mod commit;
mod error;
#[cfg(any(test, feature = "fakes"))]
pub mod fakes;
pub mod judgment;
pub mod mission;
pub mod service;
pub mod target;

pub use archive::AssignmentArchive;
pub use catalog::{CatalogResult, MissionCatalog};
pub use commit::{Commit, CommitRecord, localize_deadline, select_last};
pub use error::{ArchiveError, CatalogError, FailureClass, ServiceError};
pub use judgment::{Eligibility, JudgmentStatus, LastJudgment, MyMission, evaluate};
pub use mission::{
    Mission, MissionError, MissionId, MissionPeriod, MissionStatus, RecruitmentId,
    SubmissionMethod, UserId,
};
pub use service::MyMissionService;
pub use target::{GITHUB_HOST, TargetReference, UrlGrammar};
