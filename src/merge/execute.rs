//! Merge execution - effectful operations
//!
//! Performs one coordinated merge: resolves the effective merge policy
//! (reviewed vs YOLO), posts the review comment when the policy calls for
//! one, squash-merges, and cleans up the source branch.

use crate::error::{Error, Result};
use crate::platform::HostingService;
use crate::throttle::{ThrottlePolicy, call_with_backoff};
use crate::types::MergeOutcome;
use crate::workflow::ProgressCallback;
use crate::workflow::content;
use tracing::warn;

/// One merge to perform
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// PR number to merge
    pub pr_number: u64,
    /// Source branch, deleted after the merge
    pub branch: String,
    /// PR title, used as the squash commit title
    pub title: String,
    /// Merge policy override; `None` falls back to the process-wide default
    pub yolo: Option<bool>,
}

/// Perform one coordinated merge (EFFECTFUL)
///
/// The reviewed/YOLO decision is resolved *before* any remote call: a
/// reviewed merge posts exactly one PR comment and only then merges, while
/// a YOLO merge touches the comment collaborator not at all, since the merged
/// PR's timeline must contain zero review artifacts. Branch deletion is
/// best-effort cleanup; its failure is logged and never escalated.
pub async fn execute_merge(
    host: &dyn HostingService,
    throttle: &ThrottlePolicy,
    progress: &dyn ProgressCallback,
    default_yolo: bool,
    request: &MergeRequest,
) -> Result<MergeOutcome> {
    let yolo = request.yolo.unwrap_or(default_yolo);

    if !yolo {
        progress
            .on_message(&format!("💬 Reviewing PR #{}", request.pr_number))
            .await;
        let body = content::review_comment_body();
        call_with_backoff("PR review comment", throttle, || {
            host.comment_on_pr(request.pr_number, &body)
        })
        .await?;
    }

    progress
        .on_message(&format!(
            "🔀 Merging PR #{}{}",
            request.pr_number,
            if yolo { " (YOLO)" } else { "" }
        ))
        .await;

    let commit_title = format!("{} (#{})", request.title, request.pr_number);
    let commit_message = content::merge_commit_message(yolo);
    let result = call_with_backoff("merge", throttle, || {
        host.merge_pull_request(request.pr_number, &commit_title, &commit_message)
    })
    .await?;

    if !result.merged {
        return Err(Error::GitHubApi(format!(
            "merge of PR #{} was rejected: {}",
            request.pr_number,
            result.message.unwrap_or_default()
        )));
    }

    // Best-effort cleanup - a stray branch is not a workflow-correctness
    // issue, so failures stay at warn level.
    let deleted_branch = match call_with_backoff("branch deletion", throttle, || {
        host.delete_branch(&request.branch)
    })
    .await
    {
        Ok(()) => Some(request.branch.clone()),
        Err(e) => {
            warn!(branch = %request.branch, error = %e, "failed to delete source branch");
            None
        }
    };

    Ok(MergeOutcome {
        pr_number: request.pr_number,
        sha: result.sha,
        yolo,
        merged_at: result.merged_at,
        deleted_branch,
    })
}
