//! Aggregate reporting over the analytics store
//!
//! Derives totals and average latencies across all persisted runs and
//! renders the human-readable report artifact. The report is regenerated
//! from scratch on every run; the JSON store is the durable record.

use super::AnalyticsStore;
use crate::error::{Error, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Totals and averages across all persisted runs
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSummary {
    /// Number of finalized runs in the store
    pub runs: usize,
    /// Total issues created
    pub issues_created: u64,
    /// Total issues closed by merged PRs
    pub issues_closed: u64,
    /// Total pull requests opened
    pub prs_opened: u64,
    /// Total pull requests merged
    pub prs_merged: u64,
    /// Total merges without a review comment
    pub yolo_merges: u64,
    /// Total comments posted
    pub comments_posted: u64,
    /// Total commits carrying a Co-authored-by trailer
    pub co_authored_commits: u64,
    /// Mean issue → first-comment latency in ms (0 when no samples)
    pub avg_issue_response_ms: f64,
    /// Mean PR-open → merge latency in ms (0 when no samples)
    pub avg_pr_merge_ms: f64,
}

/// Summarize the store: counter sums plus pooled latency means
///
/// Averages pool the samples of *all* runs, not just the latest; an empty
/// pool yields 0 rather than NaN.
#[must_use]
pub fn summarize(store: &AnalyticsStore) -> AnalyticsSummary {
    let issue_samples: Vec<u64> = store
        .runs
        .iter()
        .flat_map(|r| r.issue_response_ms.iter().copied())
        .collect();
    let merge_samples: Vec<u64> = store
        .runs
        .iter()
        .flat_map(|r| r.pr_merge_ms.iter().copied())
        .collect();

    AnalyticsSummary {
        runs: store.runs.len(),
        issues_created: store.runs.iter().map(|r| r.issues_created).sum(),
        issues_closed: store.runs.iter().map(|r| r.issues_closed).sum(),
        prs_opened: store.runs.iter().map(|r| r.prs_opened).sum(),
        prs_merged: store.runs.iter().map(|r| r.prs_merged).sum(),
        yolo_merges: store.runs.iter().map(|r| r.yolo_merges).sum(),
        comments_posted: store.runs.iter().map(|r| r.comments_posted).sum(),
        co_authored_commits: store.runs.iter().map(|r| r.co_authored_commits).sum(),
        avg_issue_response_ms: mean(&issue_samples),
        avg_pr_merge_ms: mean(&merge_samples),
    }
}

fn mean(samples: &[u64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let sum: f64 = samples.iter().map(|&ms| ms as f64).sum();
    #[allow(clippy::cast_precision_loss)]
    let len = samples.len() as f64;
    sum / len
}

/// Format a millisecond duration as minutes/seconds, e.g. "1m 03s"
#[must_use]
pub fn format_duration_ms(ms: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total_secs = (ms / 1000.0).round().max(0.0) as u64;
    format!("{}m {:02}s", total_secs / 60, total_secs % 60)
}

/// Render the human-readable report
#[must_use]
pub fn render_report(store: &AnalyticsStore) -> String {
    let summary = summarize(store);
    format!(
        "# octoflow analytics report\n\
         # Regenerated on every run - the JSON store is the durable record\n\
         \n\
         generated:            {}\n\
         runs recorded:        {}\n\
         \n\
         issues created:       {}\n\
         issues closed:        {}\n\
         PRs opened:           {}\n\
         PRs merged:           {}\n\
         YOLO merges:          {}\n\
         comments posted:      {}\n\
         co-authored commits:  {}\n\
         \n\
         avg issue -> first comment:  {}\n\
         avg PR open -> merge:        {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        summary.runs,
        summary.issues_created,
        summary.issues_closed,
        summary.prs_opened,
        summary.prs_merged,
        summary.yolo_merges,
        summary.comments_posted,
        summary.co_authored_commits,
        format_duration_ms(summary.avg_issue_response_ms),
        format_duration_ms(summary.avg_pr_merge_ms),
    )
}

/// Write the report artifact, replacing any previous contents
pub fn write_report(path: &Path, store: &AnalyticsStore) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Analytics(format!("failed to create {}: {e}", dir.display())))?;
    }
    fs::write(path, render_report(store))
        .map_err(|e| Error::Analytics(format!("failed to write {}: {e}", path.display())))?;
    Ok(())
}
