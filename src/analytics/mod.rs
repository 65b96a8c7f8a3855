//! Analytics accumulation for workflow runs
//!
//! One [`Analytics`] value is owned by the orchestrator for the duration of
//! a run. `start_run` opens exactly one in-flight [`RunRecord`], the
//! `record_*` functions each mutate exactly one of its fields, and
//! `end_run` finalizes it into the persisted store. Lifecycle misuse
//! (recording without a run in flight, starting twice) is a caller bug and
//! panics rather than silently dropping data.

mod report;
mod storage;

pub use report::{AnalyticsSummary, format_duration_ms, render_report, summarize, write_report};
pub use storage::{STORE_VERSION, load_store, save_store};

use crate::error::Result;
use crate::types::RunRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Versioned, durable sequence of run records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsStore {
    /// Store schema version
    pub version: u32,
    /// All finalized runs, oldest first
    pub runs: Vec<RunRecord>,
}

impl Default for AnalyticsStore {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            runs: Vec::new(),
        }
    }
}

/// Accumulator for the current run's analytics
#[derive(Debug)]
pub struct Analytics {
    store_path: PathBuf,
    report_path: PathBuf,
    current: Option<RunRecord>,
}

impl Analytics {
    /// Create an accumulator persisting to the given store and report paths
    #[must_use]
    pub fn new(store_path: PathBuf, report_path: PathBuf) -> Self {
        Self {
            store_path,
            report_path,
            current: None,
        }
    }

    /// Path of the persisted JSON store
    #[must_use]
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Whether a run is currently in flight
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.current.is_some()
    }

    /// Begin a new run.
    ///
    /// # Panics
    /// Panics if a run is already in flight - the prior run must be ended
    /// before a new one starts.
    pub fn start_run(&mut self) {
        assert!(
            self.current.is_none(),
            "analytics: start_run called while a run is already in flight"
        );
        debug!("starting analytics run");
        self.current = Some(RunRecord::started(Utc::now()));
    }

    fn current_mut(&mut self) -> &mut RunRecord {
        self.current
            .as_mut()
            .expect("analytics: record called without a run in flight")
    }

    /// Count one created issue
    pub fn record_issue_created(&mut self) {
        self.current_mut().issues_created += 1;
    }

    /// Count one issue closed by a merged PR
    pub fn record_issue_closed(&mut self) {
        self.current_mut().issues_closed += 1;
    }

    /// Count one opened pull request
    pub fn record_pr_opened(&mut self) {
        self.current_mut().prs_opened += 1;
    }

    /// Count one merged pull request (and its YOLO flag)
    pub fn record_pr_merged(&mut self, yolo: bool) {
        let record = self.current_mut();
        record.prs_merged += 1;
        if yolo {
            record.yolo_merges += 1;
        }
    }

    /// Count one posted comment
    pub fn record_comment_posted(&mut self) {
        self.current_mut().comments_posted += 1;
    }

    /// Count one commit carrying a Co-authored-by trailer
    pub fn record_co_authored_commit(&mut self) {
        self.current_mut().co_authored_commits += 1;
    }

    /// Append one issue → first-comment latency sample
    pub fn record_issue_response(
        &mut self,
        issue_created: DateTime<Utc>,
        comment_created: DateTime<Utc>,
    ) {
        let ms = clamped_millis(issue_created, comment_created);
        self.current_mut().issue_response_ms.push(ms);
    }

    /// Append one PR-open → merge latency sample
    pub fn record_merge_latency(&mut self, pr_opened: DateTime<Utc>, merged_at: DateTime<Utc>) {
        let ms = clamped_millis(pr_opened, merged_at);
        self.current_mut().pr_merge_ms.push(ms);
    }

    /// Finalize the in-flight run.
    ///
    /// Stamps the finish time, appends the record to the persisted store,
    /// saves the store, regenerates the report artifact (best-effort), and
    /// returns the finalized record. The in-flight state is cleared, so a
    /// later `start_run` opens a fresh record.
    ///
    /// # Panics
    /// Panics if no run is in flight.
    pub fn end_run(&mut self) -> Result<RunRecord> {
        let mut record = self
            .current
            .take()
            .expect("analytics: end_run called without a run in flight");
        record.finished_at = Some(Utc::now());

        let mut store = load_store(&self.store_path);
        store.runs.push(record.clone());
        save_store(&self.store_path, &store)?;
        debug!(
            runs = store.runs.len(),
            store = %self.store_path.display(),
            "persisted analytics store"
        );

        // The JSON store is the durable source of truth; the report is a
        // derived artifact and its failure must not fail the run.
        if let Err(e) = write_report(&self.report_path, &store) {
            warn!(
                path = %self.report_path.display(),
                error = %e,
                "failed to write analytics report"
            );
        }

        Ok(record)
    }
}

/// Milliseconds between two instants, clamped at zero
///
/// Clock skew between server-stamped and locally-stamped instants can make
/// a step appear to finish before it started; such samples record as 0.
fn clamped_millis(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_milliseconds().max(0).unsigned_abs()
}
