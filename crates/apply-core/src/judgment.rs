//! Judgment summaries and who may run example tests.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::mission::{Mission, MissionId, MissionStatus, SubmissionMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JudgmentStatus {
    Started,
    Succeeded,
    Failed,
    Cancelled,
}

/// Most recent example-test run for an applicant's submission.
///
/// Pass and total counts come from the external judgment runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastJudgment {
    pub url: String,
    pub commit_hash: String,
    pub status: JudgmentStatus,
    pub pass_count: u32,
    pub total_count: u32,
    pub started_at: NaiveDateTime,
}

impl LastJudgment {
    /// Text shown next to the mission.
    pub fn summary(&self) -> String {
        match self.status {
            JudgmentStatus::Started => "judging".to_string(),
            JudgmentStatus::Succeeded => {
                format!("{}/{} passed", self.pass_count, self.total_count)
            }
            JudgmentStatus::Failed => "judgment failed".to_string(),
            JudgmentStatus::Cancelled => "judgment cancelled".to_string(),
        }
    }
}

/// Two independent projections: neither implies the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub submitted: bool,
    pub testable: bool,
}

impl Eligibility {
    /// Whether the "run example tests" action is offered right now.
    pub fn runnable(&self, status: MissionStatus) -> bool {
        self.testable && self.submitted && status == MissionStatus::Submitting
    }
}

/// `testable` mirrors the presence of an auto-judgment configuration and
/// `submitted` the presence of an assignment; mission timing plays no part.
pub fn evaluate(
    _mission: &Mission,
    has_auto_judgment_config: bool,
    has_submission: bool,
) -> Eligibility {
    Eligibility {
        submitted: has_submission,
        testable: has_auto_judgment_config,
    }
}

/// An applicant's view of one mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyMission {
    pub id: MissionId,
    pub title: String,
    pub description: String,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub submittable: bool,
    pub submission_method: SubmissionMethod,
    pub status: MissionStatus,
    pub submitted: bool,
    pub testable: bool,
    pub runnable: bool,
    pub judgment: Option<LastJudgment>,
}

impl MyMission {
    pub fn new(
        mission: &Mission,
        eligibility: Eligibility,
        judgment: Option<LastJudgment>,
        now: NaiveDateTime,
    ) -> Self {
        let status = mission.status(now);
        Self {
            id: mission.id,
            title: mission.title.clone(),
            description: mission.description.clone(),
            start_date_time: mission.period.start(),
            end_date_time: mission.period.end(),
            submittable: mission.submittable,
            submission_method: mission.submission_method,
            status,
            submitted: eligibility.submitted,
            testable: eligibility.testable,
            runnable: eligibility.runnable(status),
            judgment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::MissionPeriod;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn mission() -> Mission {
        Mission {
            id: MissionId(7),
            title: "racing car".into(),
            description: "mission description".into(),
            period: MissionPeriod::new(at(10), at(17)).unwrap(),
            submittable: true,
            hidden: false,
            submission_method: SubmissionMethod::PublicPullRequest,
        }
    }

    #[test]
    fn configured_but_not_submitted() {
        let e = evaluate(&mission(), true, false);
        assert_eq!(e, Eligibility { submitted: false, testable: true });
    }

    #[test]
    fn submitted_but_not_configured() {
        let e = evaluate(&mission(), false, true);
        assert_eq!(e, Eligibility { submitted: true, testable: false });
    }

    #[test]
    fn projections_are_independent_of_timing() {
        let mut closed = mission();
        closed.submittable = false;
        let combinations = [(false, false), (false, true), (true, false), (true, true)];
        for m in [mission(), closed] {
            for (config, submission) in combinations {
                let e = evaluate(&m, config, submission);
                assert_eq!(e.testable, config);
                assert_eq!(e.submitted, submission);
            }
        }
    }

    #[test]
    fn runnable_needs_everything_and_an_open_window() {
        let ready = Eligibility { submitted: true, testable: true };
        assert!(ready.runnable(MissionStatus::Submitting));
        assert!(!ready.runnable(MissionStatus::Ended));
        assert!(!ready.runnable(MissionStatus::Waiting));
        assert!(!ready.runnable(MissionStatus::Unsubmittable));
        let unsubmitted = Eligibility {
            submitted: false,
            testable: true,
        };
        assert!(!unsubmitted.runnable(MissionStatus::Submitting));
        let untestable = Eligibility {
            submitted: true,
            testable: false,
        };
        assert!(!untestable.runnable(MissionStatus::Submitting));
    }

    #[test]
    fn summary_text() {
        let mut judgment = LastJudgment {
            url: "https://github.com/o/r/pull/1".into(),
            commit_hash: "eeb43de3f53f4bec08e7d63f07badb66c12dfa31".into(),
            status: JudgmentStatus::Succeeded,
            pass_count: 9,
            total_count: 10,
            started_at: at(12),
        };
        assert_eq!(judgment.summary(), "9/10 passed");
        judgment.status = JudgmentStatus::Started;
        assert_eq!(judgment.summary(), "judging");
        judgment.status = JudgmentStatus::Failed;
        assert_eq!(judgment.summary(), "judgment failed");
    }

    #[test]
    fn my_mission_serializes_camel_case() {
        let view = MyMission::new(&mission(), evaluate(&mission(), true, true), None, at(12));
        assert!(view.runnable);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["submissionMethod"], "PUBLIC_PULL_REQUEST");
        assert_eq!(json["status"], "SUBMITTING");
        assert_eq!(json["testable"], true);
        assert!(json["judgment"].is_null());
    }
}
