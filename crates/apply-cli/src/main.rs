//! `apply`: mission judgment helpers.
//!
//! - `resolve`: last commit of a submission at or before its deadline
//! - `status`: mission status for a submission window
//! - `eligibility`: submitted / testable / runnable flags

mod display;
mod telemetry;

use std::time::Duration;

use anyhow::{Context, Result};
use apply_core::{AssignmentArchive, Eligibility, MissionPeriod, MissionStatus, SubmissionMethod};
use apply_github::config::{DEFAULT_API_BASE_URL, parse_offset};
use apply_github::{GitHubClient, GitHubConfig};
use chrono::{FixedOffset, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "apply")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mission judgment helpers for recruitment applicants", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// UTC offset in which zone-less date-times are read, e.g. +09:00
    #[arg(
        long,
        global = true,
        env = "APPLY_DEADLINE_OFFSET",
        default_value = "Z",
        value_parser = offset_arg
    )]
    deadline_offset: FixedOffset,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the last commit of a submission at or before a deadline
    Resolve {
        /// PUBLIC_PULL_REQUEST or PRIVATE_REPOSITORY
        #[arg(short, long)]
        method: SubmissionMethod,

        /// Pull request or repository URL
        #[arg(short, long)]
        url: String,

        /// Deadline such as 2021-10-20T10:00:00 (default: now)
        #[arg(short, long)]
        deadline: Option<NaiveDateTime>,

        /// Print the result as JSON
        #[arg(long)]
        json_output: bool,

        #[command(flatten)]
        github: GitHubArgs,
    },

    /// Derive a mission's status from its window
    Status {
        #[arg(long)]
        start: NaiveDateTime,

        #[arg(long)]
        end: NaiveDateTime,

        /// Mission is open for submissions
        #[arg(long)]
        submittable: bool,

        /// Evaluate at this instant (default: now)
        #[arg(long)]
        now: Option<NaiveDateTime>,
    },

    /// Show which judgment actions an applicant has
    Eligibility {
        /// Mission has an auto-judgment configuration
        #[arg(long)]
        auto_judgment: bool,

        /// Applicant has submitted an assignment
        #[arg(long)]
        submitted: bool,

        /// Current mission status
        #[arg(long, default_value = "SUBMITTING")]
        status: MissionStatus,
    },
}

#[derive(Args)]
struct GitHubArgs {
    /// GitHub REST API root
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Access token (empty for anonymous access)
    #[arg(long, env = "GITHUB_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "GITHUB_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Host submission URLs must point at
    #[arg(long, env = "GITHUB_WEB_HOST", default_value = apply_core::GITHUB_HOST)]
    web_host: String,
}

impl GitHubArgs {
    fn config(&self, deadline_offset: FixedOffset) -> GitHubConfig {
        GitHubConfig::default()
            .with_api_base_url(&self.api_url)
            .with_access_key(self.token.clone())
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
            .with_deadline_offset(deadline_offset)
            .with_web_host(self.web_host.clone())
    }
}

fn offset_arg(s: &str) -> Result<FixedOffset, String> {
    parse_offset(s).ok_or_else(|| format!("{s:?} is not a UTC offset like +09:00"))
}

/// Wall-clock time in `offset`, without the zone.
fn now_in(offset: FixedOffset) -> NaiveDateTime {
    Utc::now().with_timezone(&offset).naive_local()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json, telemetry::level_for(cli.verbose));
    info!("apply v{}", env!("CARGO_PKG_VERSION"));

    let offset = cli.deadline_offset;
    match cli.command {
        Commands::Resolve {
            method,
            url,
            deadline,
            json_output,
            github,
        } => {
            let client = GitHubClient::new(github.config(offset))
                .context("failed to configure the GitHub client")?;
            let deadline = deadline.unwrap_or_else(|| now_in(offset));
            let commit = client
                .resolve_commit(method, &url, deadline)
                .await
                .map_err(|e| {
                    let hint = display::failure_hint(e.class());
                    anyhow::Error::new(e)
                        .context(format!("could not resolve the last commit of {url} ({hint})"))
                })?;

            if json_output {
                let resolution = display::Resolution::new(method, &url, deadline, &commit);
                println!("{}", resolution.to_json()?);
            } else {
                println!("{}", commit.hash);
            }
        }

        Commands::Status {
            start,
            end,
            submittable,
            now,
        } => {
            let period = MissionPeriod::new(start, end).context("invalid mission window")?;
            let now = now.unwrap_or_else(|| now_in(offset));
            println!("{}", MissionStatus::of(&period, submittable, now));
        }

        Commands::Eligibility {
            auto_judgment,
            submitted,
            status,
        } => {
            let eligibility = Eligibility {
                submitted,
                testable: auto_judgment,
            };
            println!("{}", display::eligibility_card(eligibility, status));
        }
    }

    Ok(())
}
