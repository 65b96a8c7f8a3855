//! Core types for octoflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An issue created by the workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Web URL for the issue
    pub html_url: String,
    /// When the issue was created (server timestamp)
    pub created_at: DateTime<Utc>,
}

/// A comment on an issue or pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    /// Comment ID
    pub id: u64,
    /// When the comment was created (server timestamp)
    pub created_at: DateTime<Utc>,
}

/// A pull request opened by the workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Head branch name
    pub branch: String,
    /// Web URL for the PR
    pub html_url: String,
    /// When the PR was opened (server timestamp)
    pub created_at: DateTime<Utc>,
}

/// Merge-readiness of a pull request
///
/// GitHub computes mergeability asynchronously, so a freshly opened PR
/// reports `Unknown` until the computation settles. `Unknown` is transient:
/// the poller in [`crate::merge`] resolves it to a definitive answer or
/// fails safe after its attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeState {
    /// The PR can be merged
    Mergeable,
    /// The PR has conflicts and cannot be merged
    Conflicted,
    /// Mergeability not yet computed
    Unknown,
}

impl std::fmt::Display for MergeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mergeable => write!(f, "mergeable"),
            Self::Conflicted => write!(f, "conflicted"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of a merge API call
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was performed
    pub merged: bool,
    /// SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
    /// When the merge completed
    pub merged_at: DateTime<Utc>,
}

/// Outcome of one coordinated merge, reported to the analytics accumulator
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// PR number that was merged
    pub pr_number: u64,
    /// SHA of the merge commit
    pub sha: Option<String>,
    /// Whether the merge was performed without a review comment
    pub yolo: bool,
    /// When the merge completed
    pub merged_at: DateTime<Utc>,
    /// Source branch name, if cleanup deleted it
    pub deleted_branch: Option<String>,
}

/// Hosting service configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

/// Analytics record for one workflow run
///
/// Created by [`crate::analytics::Analytics::start_run`], mutated only by
/// the accumulator's record functions while the run is in flight, and
/// immutable once finalized by `end_run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished (None while in flight)
    pub finished_at: Option<DateTime<Utc>>,
    /// Issues created during the run
    pub issues_created: u64,
    /// Issues closed by merged PRs during the run
    pub issues_closed: u64,
    /// Pull requests opened during the run
    pub prs_opened: u64,
    /// Pull requests merged during the run
    pub prs_merged: u64,
    /// Merges performed without a review comment
    pub yolo_merges: u64,
    /// Comments posted on issues and PRs
    pub comments_posted: u64,
    /// Commits carrying a Co-authored-by trailer
    pub co_authored_commits: u64,
    /// Issue creation → first comment latencies, milliseconds, arrival order
    pub issue_response_ms: Vec<u64>,
    /// PR open → merge latencies, milliseconds, arrival order
    pub pr_merge_ms: Vec<u64>,
}

impl RunRecord {
    /// Create a fresh record stamped with the given start time
    #[must_use]
    pub const fn started(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            issues_created: 0,
            issues_closed: 0,
            prs_opened: 0,
            prs_merged: 0,
            yolo_merges: 0,
            comments_posted: 0,
            co_authored_commits: 0,
            issue_response_ms: Vec::new(),
            pr_merge_ms: Vec::new(),
        }
    }
}
