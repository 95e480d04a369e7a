//! Output formatting for the `apply` subcommands.

use apply_core::{Commit, Eligibility, FailureClass, MissionStatus, SubmissionMethod};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Machine-readable result of `apply resolve --json-output`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution<'a> {
    pub method: SubmissionMethod,
    pub url: &'a str,
    pub deadline: NaiveDateTime,
    pub commit_hash: &'a str,
}

impl<'a> Resolution<'a> {
    pub fn new(
        method: SubmissionMethod,
        url: &'a str,
        deadline: NaiveDateTime,
        commit: &'a Commit,
    ) -> Self {
        Self {
            method,
            url,
            deadline,
            commit_hash: &commit.hash,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `key value` lines, one flag per line, in a fixed order.
pub fn eligibility_card(eligibility: Eligibility, status: MissionStatus) -> String {
    format!(
        "{:<10} {}\n{:<10} {}\n{:<10} {}",
        "submitted",
        eligibility.submitted,
        "testable",
        eligibility.testable,
        "runnable",
        eligibility.runnable(status)
    )
}

/// What the user can do about a failed resolution.
pub fn failure_hint(class: FailureClass) -> &'static str {
    match class {
        FailureClass::ClientInput => "check the submission URL and deadline",
        FailureClass::Credentials => "check GITHUB_TOKEN",
        FailureClass::Capacity => "GitHub request quota reached, retry later",
        FailureClass::Unexpected => "GitHub could not be reached",
    }
}
