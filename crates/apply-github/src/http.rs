//! GitHub REST client resolving the last commit of a submission.
//!
//! - Pull requests: `GET /repos/{owner}/{repo}/pulls/{n}/commits?per_page=100&page={p}`,
//!   walked until a page comes back short.
//! - Repositories: `GET /repos/{owner}/{repo}/commits`, a single unpaged request.
//!
//! See <https://docs.github.com/en/rest/pulls/pulls#list-commits-on-a-pull-request>
//! and <https://docs.github.com/en/rest/commits/commits#list-commits>.

use apply_core::{
    ArchiveError, AssignmentArchive, Commit, CommitRecord, SubmissionMethod, TargetReference,
    UrlGrammar, localize_deadline, select_last,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GitHubConfig};
use crate::pagination::{PAGE_SIZE, collect_pages};

const USER_AGENT: &str = concat!("apply-github/", env!("CARGO_PKG_VERSION"));

/// Element of the commit list endpoints. Only the fields we read.
#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    committer: Committer,
}

#[derive(Debug, Deserialize)]
struct Committer {
    date: DateTime<FixedOffset>,
}

impl From<CommitResponse> for CommitRecord {
    fn from(response: CommitResponse) -> Self {
        CommitRecord::new(response.sha, response.commit.committer.date)
    }
}

/// [`AssignmentArchive`] backed by the GitHub REST API.
///
/// Holds no mutable state; one instance can serve concurrent resolutions.
pub struct GitHubClient {
    client: reqwest::Client,
    grammar: UrlGrammar,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;
        let grammar = UrlGrammar::new(&config.web_host)
            .map_err(|_| ConfigError::InvalidHost(config.web_host.clone()))?;
        Ok(Self {
            client,
            grammar,
            config,
        })
    }

    /// All commits of a pull request, across every page.
    pub async fn fetch_pull_request_commits(
        &self,
        owner: &str,
        repo: &str,
        pull_number: u64,
        url: &str,
    ) -> Result<Vec<CommitRecord>, ArchiveError> {
        let endpoint = format!(
            "{}/repos/{owner}/{repo}/pulls/{pull_number}/commits",
            self.config.api_base_url
        );
        let records = collect_pages(|page| {
            let request = format!("{endpoint}?per_page={PAGE_SIZE}&page={page}");
            async move {
                self.get_commits(&request, SubmissionMethod::PublicPullRequest, url)
                    .await
            }
        })
        .await?;
        debug!(
            owner,
            repo,
            pull_number,
            count = records.len(),
            "fetched pull request commits"
        );
        Ok(records)
    }

    /// Most recent commits of a repository's default branch, as ordered
    /// and limited by the remote's defaults.
    pub async fn fetch_repository_commits(
        &self,
        owner: &str,
        repo: &str,
        url: &str,
    ) -> Result<Vec<CommitRecord>, ArchiveError> {
        let request = format!("{}/repos/{owner}/{repo}/commits", self.config.api_base_url);
        let records = self
            .get_commits(&request, SubmissionMethod::PrivateRepository, url)
            .await?;
        debug!(owner, repo, count = records.len(), "fetched repository commits");
        Ok(records)
    }

    async fn get_commits(
        &self,
        request: &str,
        method: SubmissionMethod,
        url: &str,
    ) -> Result<Vec<CommitRecord>, ArchiveError> {
        debug!(request, "requesting commits");
        let resp = self
            .client
            .get(request)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, bearer_token(&self.config.access_key))
            .send()
            .await
            .map_err(|e| {
                warn!(request, error = %e, "commit request failed");
                ArchiveError::remote(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let err = translate_status(status, method, url);
            warn!(
                request,
                status = status.as_u16(),
                error = %err,
                "commit request rejected"
            );
            return Err(err);
        }

        // A `null` body counts as an empty listing.
        let body: Option<Vec<CommitResponse>> =
            resp.json().await.map_err(ArchiveError::remote)?;
        Ok(body
            .unwrap_or_default()
            .into_iter()
            .map(CommitRecord::from)
            .collect())
    }
}

#[async_trait]
impl AssignmentArchive for GitHubClient {
    async fn resolve_commit(
        &self,
        method: SubmissionMethod,
        url: &str,
        deadline: NaiveDateTime,
    ) -> Result<Commit, ArchiveError> {
        let records = match self.grammar.parse(method, url)? {
            TargetReference::PullRequest {
                owner,
                repo,
                pull_number,
            } => {
                self.fetch_pull_request_commits(&owner, &repo, pull_number, url)
                    .await?
            }
            TargetReference::Repository { owner, repo } => {
                self.fetch_repository_commits(&owner, &repo, url).await?
            }
        };
        let deadline = localize_deadline(deadline, self.config.deadline_offset);
        let commit = select_last(&records, deadline)?;
        info!(%method, url, commit = %commit.hash, "resolved last commit");
        Ok(commit)
    }
}

/// `Authorization` header value. An empty token is sent as an empty value
/// rather than omitted.
fn bearer_token(token: &str) -> String {
    if token.is_empty() {
        String::new()
    } else {
        format!("Bearer {token}")
    }
}

/// Map a non-success status to a failure kind.
///
/// GitHub answers 403 when the primary quota is spent and 429 for
/// secondary limits; both count as rate limiting.
fn translate_status(status: StatusCode, method: SubmissionMethod, url: &str) -> ArchiveError {
    match status {
        StatusCode::UNAUTHORIZED => ArchiveError::Unauthorized,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => ArchiveError::RateLimited,
        StatusCode::NOT_FOUND => ArchiveError::TargetNotFound {
            method,
            url: url.to_string(),
        },
        other => ArchiveError::RemoteUnavailable {
            message: format!("unexpected status {other}"),
            source: None,
        },
    }
}
