//! URL grammar for submissions.
//!
//! Pull requests: `https://<host>/<owner>/<repo>/pull/<digits>`
//! Repositories:  `https://<host>/<owner>/<repo>`
//!
//! Owner and repository names use GitHub's alphabet (ASCII letters, digits,
//! `-`, `_` and `.`) and may not be `.` or `..`, so a parsed name is always
//! safe to splice into an API path. A single trailing slash is tolerated.
//! Anything else fails with [`ArchiveError::InvalidUrlFormat`] before a
//! request is made.

use regex::Regex;

use crate::error::ArchiveError;
use crate::mission::SubmissionMethod;

pub const GITHUB_HOST: &str = "github.com";

const NAME: &str = r"[A-Za-z0-9_.-]+";

fn is_dot_segment(name: &str) -> bool {
    name == "." || name == ".."
}

/// Parsed components of a submission URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetReference {
    PullRequest {
        owner: String,
        repo: String,
        pull_number: u64,
    },
    Repository {
        owner: String,
        repo: String,
    },
}

impl TargetReference {
    pub fn owner(&self) -> &str {
        match self {
            Self::PullRequest { owner, .. } | Self::Repository { owner, .. } => owner,
        }
    }

    pub fn repo(&self) -> &str {
        match self {
            Self::PullRequest { repo, .. } | Self::Repository { repo, .. } => repo,
        }
    }
}

/// Compiled URL patterns for one web host.
#[derive(Debug, Clone)]
pub struct UrlGrammar {
    pull_request: Regex,
    repository: Regex,
}

impl UrlGrammar {
    pub fn new(host: &str) -> Result<Self, regex::Error> {
        let host = regex::escape(host);
        let pull_request = Regex::new(&format!(
            r"^https://{host}/(?P<owner>{NAME})/(?P<repo>{NAME})/pull/(?P<pull>\d+)/?$"
        ))?;
        let repository = Regex::new(&format!(
            r"^https://{host}/(?P<owner>{NAME})/(?P<repo>{NAME}?)/?$"
        ))?;
        Ok(Self {
            pull_request,
            repository,
        })
    }

    pub fn github() -> Result<Self, regex::Error> {
        Self::new(GITHUB_HOST)
    }

    /// Parse the URL with the grammar required by `method`.
    pub fn parse(
        &self,
        method: SubmissionMethod,
        url: &str,
    ) -> Result<TargetReference, ArchiveError> {
        match method {
            SubmissionMethod::PublicPullRequest => self.parse_pull_request(url),
            SubmissionMethod::PrivateRepository => self.parse_repository(url),
        }
    }

    pub fn parse_pull_request(&self, url: &str) -> Result<TargetReference, ArchiveError> {
        let invalid = || ArchiveError::InvalidUrlFormat {
            method: SubmissionMethod::PublicPullRequest,
            url: url.to_string(),
        };
        let caps = self.pull_request.captures(url).ok_or_else(invalid)?;
        if is_dot_segment(&caps["owner"]) || is_dot_segment(&caps["repo"]) {
            return Err(invalid());
        }
        let pull_number = caps["pull"].parse().map_err(|_| invalid())?;
        Ok(TargetReference::PullRequest {
            owner: caps["owner"].to_string(),
            repo: caps["repo"].to_string(),
            pull_number,
        })
    }

    pub fn parse_repository(&self, url: &str) -> Result<TargetReference, ArchiveError> {
        let invalid = || ArchiveError::InvalidUrlFormat {
            method: SubmissionMethod::PrivateRepository,
            url: url.to_string(),
        };
        let caps = self.repository.captures(url).ok_or_else(invalid)?;
        if is_dot_segment(&caps["owner"]) || is_dot_segment(&caps["repo"]) {
            return Err(invalid());
        }
        Ok(TargetReference::Repository {
            owner: caps["owner"].to_string(),
            repo: caps["repo"].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> UrlGrammar {
        UrlGrammar::github().unwrap()
    }

    fn assert_invalid(result: Result<TargetReference, ArchiveError>) {
        assert!(
            matches!(result, Err(ArchiveError::InvalidUrlFormat { .. })),
            "expected InvalidUrlFormat, got {result:?}"
        );
    }

    #[test]
    fn parses_pull_request() {
        let target = grammar()
            .parse_pull_request("https://github.com/woowacourse/service-apply/pull/367")
            .unwrap();
        assert_eq!(
            target,
            TargetReference::PullRequest {
                owner: "woowacourse".into(),
                repo: "service-apply".into(),
                pull_number: 367,
            }
        );
    }

    #[test]
    fn pull_request_tolerates_trailing_slash() {
        let target = grammar()
            .parse_pull_request("https://github.com/o/r/pull/1/")
            .unwrap();
        assert_eq!(target.owner(), "o");
        assert_eq!(target.repo(), "r");
    }

    #[test]
    fn rejects_malformed_pull_requests() {
        let g = grammar();
        for url in [
            "",
            "https://github.com/woowacourse/service-apply",
            "https://github.com/woowacourse/service-apply/pull/",
            "https://github.com/woowacourse/service-apply/pull/12a",
            "https://github.com/woowacourse/service-apply/pulls/1",
            "https://github.com/woowacourse/service-apply/pull/1/files",
            "http://github.com/woowacourse/service-apply/pull/1",
            "https://gitlab.com/woowacourse/service-apply/pull/1",
            "https://github.com//service-apply/pull/1",
            "https://github.com/woowacourse/service-apply/pull/99999999999999999999999",
            "https://github.com/woowacourse/service-apply/pull/1?diff=split",
            "https://github.com/woowacourse/service-apply/pull/1#discussion",
            "https://github.com/woowacourse/service-apply?x=/pull/1",
            "https://github.com/woowacourse/service-apply#/pull/1",
            "https://github.com/../service-apply/pull/1",
            "https://github.com/woowacourse/../pull/1",
            "https://github.com/./service-apply/pull/1",
        ] {
            assert_invalid(g.parse_pull_request(url));
        }
    }

    #[test]
    fn parses_repository() {
        let target = grammar()
            .parse_repository("https://github.com/woowacourse/java-chicken-2019")
            .unwrap();
        assert_eq!(
            target,
            TargetReference::Repository {
                owner: "woowacourse".into(),
                repo: "java-chicken-2019".into(),
            }
        );
    }

    #[test]
    fn repository_trailing_slash_is_not_part_of_repo() {
        let target = grammar()
            .parse_repository("https://github.com/woowacourse/java-chicken-2019/")
            .unwrap();
        assert_eq!(target.repo(), "java-chicken-2019");
    }

    #[test]
    fn rejects_repository_with_extra_segments() {
        let g = grammar();
        assert_invalid(g.parse_repository("https://github.com/woowacourse/service-apply/pull/1"));
        assert_invalid(g.parse_repository("https://github.com/woowacourse"));
        assert_invalid(g.parse_repository("https://github.com/woowacourse/"));
        assert_invalid(g.parse_repository("git@github.com:woowacourse/service-apply.git"));
    }

    #[test]
    fn rejects_repository_with_query_fragment_or_dot_segments() {
        let g = grammar();
        for url in [
            "https://github.com/o/r?per_page=1",
            "https://github.com/o/r#readme",
            "https://github.com/o/r/?tab=readme",
            "https://github.com/../..",
            "https://github.com/o/..",
            "https://github.com/./r",
            "https://github.com/o/r%2Fcommits",
            "https://github.com/o/r r",
        ] {
            assert_invalid(g.parse_repository(url));
        }
    }

    #[test]
    fn dots_inside_names_are_allowed() {
        let target = grammar()
            .parse_repository("https://github.com/some.user/repo.name-2_x")
            .unwrap();
        assert_eq!(target.owner(), "some.user");
        assert_eq!(target.repo(), "repo.name-2_x");

        let target = grammar()
            .parse_pull_request("https://github.com/o/.github/pull/4")
            .unwrap();
        assert_eq!(target.repo(), ".github");
    }

    #[test]
    fn parse_dispatches_on_method() {
        let g = grammar();
        let url = "https://github.com/o/r/pull/3";
        assert!(g.parse(SubmissionMethod::PublicPullRequest, url).is_ok());
        assert_invalid(g.parse(SubmissionMethod::PrivateRepository, url));
    }

    #[test]
    fn host_is_matched_literally() {
        let g = UrlGrammar::new("github.example.com").unwrap();
        assert!(g.parse_repository("https://github.example.com/o/r").is_ok());
        assert_invalid(g.parse_repository("https://githubXexampleXcom/o/r"));
        assert_invalid(g.parse_repository("https://github.com/o/r"));
    }
}
