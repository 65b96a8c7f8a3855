//! Authentication for GitHub
//!
//! Supports environment variables and CLI-based auth (gh).

use crate::error::{Error, Result};
use std::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token from the gh CLI
    Cli,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar => write!(f, "environment variable"),
            Self::Cli => write!(f, "gh CLI"),
        }
    }
}

/// A resolved GitHub token and where it came from
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The token itself
    pub token: String,
    /// Where the token was found
    pub source: AuthSource,
}

/// Resolve a GitHub token: `GITHUB_TOKEN`, then `GH_TOKEN`, then the gh
/// CLI's stored credentials.
pub fn resolve_github_token() -> Result<AuthConfig> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var) {
            let token = token.trim();
            if !token.is_empty() {
                debug!(source = var, "using token from environment");
                return Ok(AuthConfig {
                    token: token.to_string(),
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    if let Ok(output) = Command::new("gh").args(["auth", "token"]).output()
        && output.status.success()
    {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            debug!("using token from gh CLI");
            return Ok(AuthConfig {
                token,
                source: AuthSource::Cli,
            });
        }
    }

    Err(Error::Auth(
        "no GitHub token found; set GITHUB_TOKEN/GH_TOKEN or run 'gh auth login'".to_string(),
    ))
}
