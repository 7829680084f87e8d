//! Process configuration.
//!
//! Values come from command-line flags with environment fallbacks. A `.env`
//! file in the working directory is loaded before parsing.

use crate::services::github_client::{GitHubClientConfig, DEFAULT_API_URL};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Track upstream repositories and record their latest release.
#[derive(Debug, Clone, Parser)]
#[command(name = "release-radar", version, about)]
pub struct AppConfig {
    /// SQLite database file.
    #[arg(long, env = "RELEASE_RADAR_DB", default_value = "release-radar.db")]
    pub database: PathBuf,

    /// Address the JSON API listens on.
    #[arg(long, env = "RELEASE_RADAR_BIND", default_value = "127.0.0.1:4000")]
    pub bind: SocketAddr,

    /// GitHub API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// GitHub token; requests are anonymous without one.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Timeout for a single upstream request, in seconds.
    #[arg(long, env = "RELEASE_RADAR_REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Run a bulk sync every N seconds. 0 disables periodic sync.
    #[arg(long, env = "RELEASE_RADAR_SYNC_INTERVAL", default_value_t = 0)]
    pub sync_interval_secs: u64,
}

impl AppConfig {
    /// Load `.env` (if present) and parse the process arguments.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Failed to load .env: {}", e);
            }
        }
        Self::parse()
    }

    pub fn github_client_config(&self) -> GitHubClientConfig {
        GitHubClientConfig {
            base_url: self.github_api_url.clone(),
            token: self.github_token.clone().filter(|t| !t.trim().is_empty()),
            timeout_secs: self.request_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::try_parse_from(["release-radar"]).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.sync_interval_secs, 0);
        assert_eq!(config.github_api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = AppConfig::try_parse_from([
            "release-radar",
            "--database",
            "/tmp/radar.db",
            "--bind",
            "0.0.0.0:8080",
            "--github-token",
            "abc",
            "--sync-interval-secs",
            "600",
        ])
        .unwrap();

        assert_eq!(config.database, PathBuf::from("/tmp/radar.db"));
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.sync_interval_secs, 600);
        assert_eq!(config.github_client_config().token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_token_is_anonymous() {
        let config =
            AppConfig::try_parse_from(["release-radar", "--github-token", "  "]).unwrap();
        assert!(config.github_client_config().token.is_none());
    }
}
