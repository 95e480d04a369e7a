//! GitHub-backed assignment archive.

pub mod config;
pub mod http;
pub mod pagination;

pub use config::{ConfigError, GitHubConfig};
pub use http::GitHubClient;
