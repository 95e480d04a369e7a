//! In-memory fakes for the archive and catalog seams. Built for tests and
//! behind the `fakes` feature.
//!
//! `StubArchive` runs the real URL grammar and last-commit selection over
//! canned records, so it fails the same way the GitHub client does.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};

use crate::archive::AssignmentArchive;
use crate::catalog::{CatalogResult, MissionCatalog};
use crate::commit::{Commit, CommitRecord, localize_deadline, select_last};
use crate::error::{ArchiveError, CatalogError};
use crate::judgment::LastJudgment;
use crate::mission::{Mission, MissionId, RecruitmentId, SubmissionMethod, UserId};
use crate::target::UrlGrammar;

// ---------------------------------------------------------------------------
// StubArchive
// ---------------------------------------------------------------------------

/// Upstream failure a [`StubArchive`] should report for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubFailure {
    Unauthorized,
    RateLimited,
    NotFound,
    Unavailable,
}

#[derive(Debug)]
pub struct StubArchive {
    grammar: UrlGrammar,
    offset: FixedOffset,
    records: Mutex<HashMap<String, Vec<CommitRecord>>>,
    failures: Mutex<HashMap<String, StubFailure>>,
    calls: AtomicUsize,
}

impl Default for StubArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl StubArchive {
    /// Stub for `github.com` URLs with deadlines read as UTC.
    pub fn new() -> Self {
        Self::with_offset(Utc.fix())
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            grammar: UrlGrammar::github().expect("github grammar compiles"),
            offset,
            records: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Records returned for `url`. URLs without records resolve as an
    /// existing target with no commits.
    pub fn set_records(&self, url: &str, records: Vec<CommitRecord>) {
        self.records.lock().unwrap().insert(url.to_string(), records);
    }

    pub fn fail_with(&self, url: &str, failure: StubFailure) {
        self.failures.lock().unwrap().insert(url.to_string(), failure);
    }

    /// Number of resolutions that got past URL validation.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssignmentArchive for StubArchive {
    async fn resolve_commit(
        &self,
        method: SubmissionMethod,
        url: &str,
        deadline: NaiveDateTime,
    ) -> Result<Commit, ArchiveError> {
        self.grammar.parse(method, url)?;
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.failures.lock().unwrap().get(url).copied() {
            return Err(match failure {
                StubFailure::Unauthorized => ArchiveError::Unauthorized,
                StubFailure::RateLimited => ArchiveError::RateLimited,
                StubFailure::NotFound => ArchiveError::TargetNotFound {
                    method,
                    url: url.to_string(),
                },
                StubFailure::Unavailable => ArchiveError::RemoteUnavailable {
                    message: "stubbed outage".to_string(),
                    source: None,
                },
            });
        }

        let records = self.records.lock().unwrap().get(url).cloned().unwrap_or_default();
        select_last(&records, localize_deadline(deadline, self.offset))
    }
}

// ---------------------------------------------------------------------------
// MemoryMissionCatalog
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct CatalogState {
    missions: HashMap<MissionId, (RecruitmentId, Mission)>,
    judgment_items: HashSet<MissionId>,
    assignments: HashSet<(UserId, MissionId)>,
    judgments: HashMap<(UserId, MissionId), LastJudgment>,
    outage: Option<String>,
}

/// Catalog where every user is a target of every mission it holds.
#[derive(Debug, Default)]
pub struct MemoryMissionCatalog {
    state: Mutex<CatalogState>,
}

impl MemoryMissionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mission(&self, recruitment: RecruitmentId, mission: Mission) {
        self.state
            .lock()
            .unwrap()
            .missions
            .insert(mission.id, (recruitment, mission));
    }

    pub fn add_judgment_item(&self, mission: MissionId) {
        self.state.lock().unwrap().judgment_items.insert(mission);
    }

    pub fn add_assignment(&self, user: UserId, mission: MissionId) {
        self.state.lock().unwrap().assignments.insert((user, mission));
    }

    pub fn set_last_judgment(&self, user: UserId, mission: MissionId, judgment: LastJudgment) {
        self.state
            .lock()
            .unwrap()
            .judgments
            .insert((user, mission), judgment);
    }

    /// Make every subsequent read fail with [`CatalogError::Backend`].
    pub fn fail_backend(&self, message: impl Into<String>) {
        self.state.lock().unwrap().outage = Some(message.into());
    }

    fn read(&self) -> CatalogResult<MutexGuard<'_, CatalogState>> {
        let state = self.state.lock().unwrap();
        match &state.outage {
            Some(message) => Err(CatalogError::Backend(message.clone())),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl MissionCatalog for MemoryMissionCatalog {
    async fn missions_for(
        &self,
        _user: UserId,
        recruitment: RecruitmentId,
    ) -> CatalogResult<Vec<Mission>> {
        let state = self.read()?;
        let mut missions: Vec<Mission> = state
            .missions
            .values()
            .filter(|(r, _)| *r == recruitment)
            .map(|(_, m)| m.clone())
            .collect();
        missions.sort_by_key(|m| m.id);
        Ok(missions)
    }

    async fn mission(&self, id: MissionId) -> CatalogResult<Mission> {
        let state = self.read()?;
        state
            .missions
            .get(&id)
            .map(|(_, m)| m.clone())
            .ok_or(CatalogError::MissionNotFound(id))
    }

    async fn has_auto_judgment_config(&self, id: MissionId) -> CatalogResult<bool> {
        Ok(self.read()?.judgment_items.contains(&id))
    }

    async fn has_submission(&self, user: UserId, id: MissionId) -> CatalogResult<bool> {
        Ok(self.read()?.assignments.contains(&(user, id)))
    }

    async fn last_judgment(
        &self,
        user: UserId,
        id: MissionId,
    ) -> CatalogResult<Option<LastJudgment>> {
        Ok(self.read()?.judgments.get(&(user, id)).cloned())
    }
}
