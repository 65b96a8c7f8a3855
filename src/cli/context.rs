//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by the run and auth commands.

use octoflow::auth::{AuthSource, resolve_github_token};
use octoflow::config::WorkflowConfig;
use octoflow::error::Result;
use octoflow::platform::{GitHubService, HostingService};

/// Shared context for CLI commands that talk to GitHub
///
/// Bundles the common setup: resolving configuration (defaults + file +
/// flags), resolving the token, and constructing the hosting service.
pub struct CommandContext {
    /// Resolved workflow configuration
    pub config: WorkflowConfig,
    /// Hosting service for the configured repository
    pub host: Box<dyn HostingService>,
    /// Where the token came from
    pub auth_source: AuthSource,
}

impl CommandContext {
    /// Create a new command context for the given repository slug
    pub fn new(repo: Option<&str>) -> Result<Self> {
        let config = WorkflowConfig::load(repo)?;
        let auth = resolve_github_token()?;
        let host = GitHubService::new(
            &auth.token,
            config.owner.clone(),
            config.repo.clone(),
            config.host.clone(),
        )?;

        Ok(Self {
            config,
            host: Box::new(host),
            auth_source: auth.source,
        })
    }
}
