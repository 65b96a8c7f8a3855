//! Workflow orchestration
//!
//! The top-level state machine. Each iteration walks
//! issue → comment → branch/commit/PR → comment-or-merge, reporting every
//! completed step to the analytics accumulator. One failed iteration is
//! logged and abandoned; the run continues, so analytics already gathered
//! are never forfeited to a single bad iteration.

pub mod content;

use crate::analytics::Analytics;
use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::merge::{MergeRequest, execute_merge, wait_for_mergeable};
use crate::platform::HostingService;
use crate::throttle::call_with_backoff;
use crate::types::{Issue, PullRequest, RunRecord};
use async_trait::async_trait;
use tracing::{info, warn};

/// Progress reporting callback for user-facing status updates
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Report a status message
    async fn on_message(&self, message: &str);
}

/// Progress sink that discards all messages
#[derive(Debug, Default)]
pub struct NoProgress;

#[async_trait]
impl ProgressCallback for NoProgress {
    async fn on_message(&self, _message: &str) {}
}

/// One bounded workflow run against a hosting service
///
/// Owns the analytics accumulator for the run's duration - iterations are
/// strictly sequential, so the accumulator has exactly one writer.
pub struct Workflow<'a> {
    host: &'a dyn HostingService,
    config: &'a WorkflowConfig,
    analytics: &'a mut Analytics,
    progress: &'a dyn ProgressCallback,
}

impl<'a> Workflow<'a> {
    /// Create a workflow over the given collaborators
    pub fn new(
        host: &'a dyn HostingService,
        config: &'a WorkflowConfig,
        analytics: &'a mut Analytics,
        progress: &'a dyn ProgressCallback,
    ) -> Self {
        Self {
            host,
            config,
            analytics,
            progress,
        }
    }

    /// Execute the run: `min(max_issues, max_prs)` iterations, then finalize.
    ///
    /// Every iteration produces exactly one issue and at most one PR, so the
    /// iteration count is the minimum of the two caps, not their sum. A
    /// failing step abandons only its iteration. Finalization happens
    /// exactly once, after all iterations were attempted.
    pub async fn run(mut self) -> Result<RunRecord> {
        let iterations = self.config.iterations();
        info!(iterations, "starting workflow run");
        self.analytics.start_run();

        for sequence in 1..=iterations {
            self.progress
                .on_message(&format!("▶ Iteration {sequence}/{iterations}"))
                .await;
            if let Err(e) = self.run_iteration(sequence).await {
                warn!(
                    iteration = sequence,
                    error = %e,
                    "iteration failed, continuing with the next"
                );
                self.progress
                    .on_message(&format!("⚠️  Iteration {sequence} failed: {e}"))
                    .await;
            }
            if sequence < iterations {
                tokio::time::sleep(self.config.iteration_pause).await;
            }
        }

        let record = self.analytics.end_run()?;
        info!(
            issues = record.issues_created,
            prs = record.prs_opened,
            merges = record.prs_merged,
            "workflow run complete"
        );
        Ok(record)
    }

    /// One issue → PR → merge cycle
    async fn run_iteration(&mut self, sequence: u32) -> Result<()> {
        let host = self.host;
        let throttle = &self.config.throttle;

        // CreateIssue
        let title = content::issue_title(sequence);
        let body = content::issue_body();
        let issue = call_with_backoff("issue creation", throttle, || {
            host.create_issue(&title, &body)
        })
        .await?;
        self.analytics.record_issue_created();
        self.progress
            .on_message(&format!("📝 Opened issue #{}: {}", issue.number, issue.html_url))
            .await;

        // Let the remote index the new issue before we reference it. This is
        // a read-after-write-lag affordance, not rate limiting.
        tokio::time::sleep(self.config.indexing_pause).await;

        // CommentOnIssue
        let comment_body = content::issue_comment_body(issue.number);
        let comment = call_with_backoff("issue comment", throttle, || {
            host.comment_on_issue(issue.number, &comment_body)
        })
        .await?;
        self.analytics.record_comment_posted();
        self.analytics
            .record_issue_response(issue.created_at, comment.created_at);

        tokio::time::sleep(self.config.indexing_pause).await;

        // OpenPR (branch + commit + PR)
        let pr = self.open_pull_request(&issue).await?;
        self.analytics.record_pr_opened();
        if self.config.co_author.is_some() {
            self.analytics.record_co_authored_commit();
        }
        self.progress
            .on_message(&format!("🔃 Opened PR #{}: {}", pr.number, pr.html_url))
            .await;

        tokio::time::sleep(self.config.indexing_pause).await;

        if self.config.auto_merge {
            self.merge_pull_request(&issue, &pr).await?;
        } else {
            // No merge: the PR comment is posted directly and the iteration
            // completes with the PR left open.
            let body = content::pr_comment_body(issue.number);
            call_with_backoff("PR comment", throttle, || {
                host.comment_on_pr(pr.number, &body)
            })
            .await?;
            self.analytics.record_comment_posted();
        }

        Ok(())
    }

    /// Create the branch, commit the workflow note, and open the PR
    async fn open_pull_request(&self, issue: &Issue) -> Result<PullRequest> {
        let host = self.host;
        let throttle = &self.config.throttle;
        let base = &self.config.base_branch;

        let sha = call_with_backoff("base head lookup", throttle, || {
            host.branch_head_sha(base)
        })
        .await?;

        let branch = content::branch_name(issue.number);
        call_with_backoff("branch creation", throttle, || {
            host.create_branch(&branch, &sha)
        })
        .await?;

        let path = content::file_path(issue.number);
        let message = content::commit_message(issue.number, self.config.co_author.as_deref());
        let file_content = content::file_content(issue);
        call_with_backoff("contents upsert", throttle, || {
            host.put_file(&branch, &path, &message, &file_content)
        })
        .await?;

        let title = content::pr_title(issue);
        let body = content::pr_body(issue.number);
        call_with_backoff("PR creation", throttle, || {
            host.create_pull_request(&branch, base, &title, &body)
        })
        .await
    }

    /// Poll mergeability and merge when the remote confirms it
    async fn merge_pull_request(&mut self, issue: &Issue, pr: &PullRequest) -> Result<()> {
        let mergeable = wait_for_mergeable(
            self.host,
            &self.config.throttle,
            pr.number,
            &self.config.poll,
        )
        .await?;

        if !mergeable {
            warn!(pr_number = pr.number, "PR not mergeable, skipping merge");
            self.progress
                .on_message(&format!("⏭️  PR #{} not mergeable, skipped", pr.number))
                .await;
            return Ok(());
        }

        let request = MergeRequest {
            pr_number: pr.number,
            branch: pr.branch.clone(),
            title: content::pr_title(issue),
            yolo: None,
        };
        let outcome = execute_merge(
            self.host,
            &self.config.throttle,
            self.progress,
            self.config.yolo,
            &request,
        )
        .await?;

        if !outcome.yolo {
            // The coordinator's pre-merge review comment is this
            // iteration's PR comment.
            self.analytics.record_comment_posted();
        }
        self.analytics.record_pr_merged(outcome.yolo);
        // The PR body's "Closes #N" closes the linked issue on merge.
        self.analytics.record_issue_closed();
        self.analytics
            .record_merge_latency(pr.created_at, outcome.merged_at);
        self.progress
            .on_message(&format!(
                "✅ Merged PR #{}: {}",
                outcome.pr_number,
                outcome.sha.as_deref().unwrap_or("(no sha)")
            ))
            .await;

        Ok(())
    }
}
