//! Hosting platform services
//!
//! Provides the interface the workflow core consumes for issue, comment,
//! branch, and pull-request operations, plus its GitHub implementation.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{HostConfig, Issue, IssueComment, MergeResult, MergeState, PullRequest};
use async_trait::async_trait;

/// Hosting service trait for the workflow's remote operations
///
/// This trait abstracts the hosting API so the orchestrator, merge
/// coordinator, and poller can be exercised against a mock in tests. Every
/// method performs a single remote call with no internal retry; resilience
/// policy lives in [`crate::throttle`].
#[async_trait]
pub trait HostingService: Send + Sync {
    /// Create a new issue
    async fn create_issue(&self, title: &str, body: &str) -> Result<Issue>;

    /// Create a comment on an issue
    async fn comment_on_issue(&self, number: u64, body: &str) -> Result<IssueComment>;

    /// Create a comment on a pull request
    async fn comment_on_pr(&self, number: u64, body: &str) -> Result<IssueComment>;

    /// Look up the head commit SHA of a branch
    async fn branch_head_sha(&self, branch: &str) -> Result<String>;

    /// Create a branch pointing at the given commit
    ///
    /// A ref that already exists is an error: the workflow owns its branch
    /// names and a collision means the iteration's identity is compromised.
    async fn create_branch(&self, name: &str, from_sha: &str) -> Result<()>;

    /// Create or update a file on a branch (upsert by path)
    ///
    /// Safe to repeat: a conflict response for an already-present path is
    /// treated as success by implementations.
    async fn put_file(&self, branch: &str, path: &str, message: &str, content: &str)
    -> Result<()>;

    /// Open a pull request
    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest>;

    /// Check a PR's merge-readiness (single poll, no internal retry)
    async fn merge_state(&self, pr_number: u64) -> Result<MergeState>;

    /// Squash-merge a pull request with the given commit title and message
    async fn merge_pull_request(
        &self,
        pr_number: u64,
        title: &str,
        message: &str,
    ) -> Result<MergeResult>;

    /// Delete a branch
    async fn delete_branch(&self, name: &str) -> Result<()>;

    /// Get the hosting configuration
    fn config(&self) -> &HostConfig;
}
