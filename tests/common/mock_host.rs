//! Mock hosting service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use octoflow::error::{Error, Result};
use octoflow::platform::HostingService;
use octoflow::types::{HostConfig, Issue, IssueComment, MergeResult, MergeState, PullRequest};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Call record for `comment_on_issue` / `comment_on_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCall {
    pub number: u64,
    pub body: String,
}

/// Call record for `create_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBranchCall {
    pub name: String,
    pub from_sha: String,
}

/// Call record for `put_file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutFileCall {
    pub branch: String,
    pub path: String,
    pub message: String,
}

/// Call record for `create_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `merge_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub pr_number: u64,
    pub title: String,
    pub message: String,
}

/// A scripted response for one upcoming call to an operation
///
/// `None` lets the call proceed normally; `Some` fails it with the given
/// HTTP status and optional retry-after hint.
type ScriptedResponse = Option<(u16, Option<Duration>)>;

/// Simple mock hosting service for testing
///
/// This manually implements `HostingService` rather than using a mocking
/// crate, matching how the rest of the test suite drives the workflow.
///
/// Features:
/// - Auto-incrementing issue/PR/comment numbers
/// - Call tracking (per operation, plus a global ordered operation log)
/// - Scripted merge states per PR for poller tests
/// - Per-operation error injection queues for throttle/failure tests
pub struct MockHostService {
    config: HostConfig,
    next_issue_number: AtomicU64,
    next_pr_number: AtomicU64,
    next_comment_id: AtomicU64,
    // Scripted merge states, consumed one per poll; exhausted → Mergeable
    merge_states: Mutex<HashMap<u64, VecDeque<MergeState>>>,
    // PRs whose merge call reports merged: false
    merge_rejected: Mutex<HashSet<u64>>,
    // Call tracking
    create_issue_calls: Mutex<Vec<(String, String)>>,
    issue_comment_calls: Mutex<Vec<CommentCall>>,
    pr_comment_calls: Mutex<Vec<CommentCall>>,
    branch_head_calls: Mutex<Vec<String>>,
    create_branch_calls: Mutex<Vec<CreateBranchCall>>,
    put_file_calls: Mutex<Vec<PutFileCall>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    merge_state_calls: Mutex<Vec<u64>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    delete_branch_calls: Mutex<Vec<String>>,
    // Ordered log of operation names, for cross-operation ordering asserts
    operation_log: Mutex<Vec<&'static str>>,
    // Error injection queues, keyed by operation name
    scripted: Mutex<HashMap<&'static str, VecDeque<ScriptedResponse>>>,
}

impl MockHostService {
    /// Create a new mock with the given config
    pub fn with_config(config: HostConfig) -> Self {
        Self {
            config,
            next_issue_number: AtomicU64::new(1),
            next_pr_number: AtomicU64::new(100),
            next_comment_id: AtomicU64::new(1000),
            merge_states: Mutex::new(HashMap::new()),
            merge_rejected: Mutex::new(HashSet::new()),
            create_issue_calls: Mutex::new(Vec::new()),
            issue_comment_calls: Mutex::new(Vec::new()),
            pr_comment_calls: Mutex::new(Vec::new()),
            branch_head_calls: Mutex::new(Vec::new()),
            create_branch_calls: Mutex::new(Vec::new()),
            put_file_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            merge_state_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            delete_branch_calls: Mutex::new(Vec::new()),
            operation_log: Mutex::new(Vec::new()),
            scripted: Mutex::new(HashMap::new()),
        }
    }

    // === Scripting methods ===

    /// Let the next call to `operation` proceed normally
    ///
    /// Useful for failing the Nth call: push N-1 passes, then a failure.
    pub fn succeed_next(&self, operation: &'static str) {
        self.scripted
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(None);
    }

    /// Fail the next call to `operation` with the given HTTP status
    pub fn fail_next(&self, operation: &'static str, status: u16) {
        self.fail_next_with(operation, status, None);
    }

    /// Fail the next call to `operation` with a status and retry-after hint
    pub fn fail_next_with(
        &self,
        operation: &'static str,
        status: u16,
        retry_after: Option<Duration>,
    ) {
        self.scripted
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(Some((status, retry_after)));
    }

    /// Queue a merge state for the given PR (consumed one per poll)
    pub fn push_merge_state(&self, pr_number: u64, state: MergeState) {
        self.merge_states
            .lock()
            .unwrap()
            .entry(pr_number)
            .or_default()
            .push_back(state);
    }

    /// Make the merge API report `merged: false` for a PR
    pub fn reject_merge(&self, pr_number: u64) {
        self.merge_rejected.lock().unwrap().insert(pr_number);
    }

    // === Internal helpers ===

    fn record(&self, operation: &'static str) -> Result<()> {
        self.operation_log.lock().unwrap().push(operation);
        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(Some((status, retry_after))) => Err(Error::ApiStatus {
                operation: operation.to_string(),
                status,
                retry_after,
                message: "injected failure".to_string(),
            }),
            _ => Ok(()),
        }
    }

    // === Call verification methods ===

    /// Ordered names of all operations invoked so far
    pub fn operation_log(&self) -> Vec<&'static str> {
        self.operation_log.lock().unwrap().clone()
    }

    /// Get all `create_issue` calls as (title, body)
    pub fn create_issue_calls(&self) -> Vec<(String, String)> {
        self.create_issue_calls.lock().unwrap().clone()
    }

    /// Get all issue comment calls
    pub fn issue_comment_calls(&self) -> Vec<CommentCall> {
        self.issue_comment_calls.lock().unwrap().clone()
    }

    /// Get all PR comment calls
    pub fn pr_comment_calls(&self) -> Vec<CommentCall> {
        self.pr_comment_calls.lock().unwrap().clone()
    }

    /// Get all `create_branch` calls
    pub fn create_branch_calls(&self) -> Vec<CreateBranchCall> {
        self.create_branch_calls.lock().unwrap().clone()
    }

    /// Get all `put_file` calls
    pub fn put_file_calls(&self) -> Vec<PutFileCall> {
        self.put_file_calls.lock().unwrap().clone()
    }

    /// Get all `create_pull_request` calls
    pub fn create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// PR numbers `merge_state` was polled for, in order
    pub fn merge_state_calls(&self) -> Vec<u64> {
        self.merge_state_calls.lock().unwrap().clone()
    }

    /// Get all merge calls
    pub fn merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Branch names `delete_branch` was called with
    pub fn delete_branch_calls(&self) -> Vec<String> {
        self.delete_branch_calls.lock().unwrap().clone()
    }

    /// Assert that `merge_pull_request` was called for a specific PR
    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.merge_calls();
        assert!(
            calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pull_request({pr_number}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pull_request` was NOT called for a specific PR
    pub fn assert_merge_not_called(&self, pr_number: u64) {
        let calls = self.merge_calls();
        assert!(
            !calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pull_request({pr_number}) NOT to be called but it was: {calls:?}"
        );
    }

    /// Assert that no PR comment was ever posted
    pub fn assert_no_pr_comments(&self) {
        let calls = self.pr_comment_calls();
        assert!(
            calls.is_empty(),
            "Expected no PR comments but got: {calls:?}"
        );
    }

    /// Assert that every `comment_on_pr` precedes every `merge_pull_request`
    /// in the operation log
    pub fn assert_comment_before_merge(&self) {
        let log = self.operation_log();
        let last_comment = log.iter().rposition(|&op| op == "comment_on_pr");
        let first_merge = log.iter().position(|&op| op == "merge_pull_request");
        match (last_comment, first_merge) {
            (Some(comment), Some(merge)) => assert!(
                comment < merge,
                "Expected PR comment before merge but log was: {log:?}"
            ),
            _ => panic!("Expected both a PR comment and a merge in log: {log:?}"),
        }
    }
}

#[async_trait]
impl HostingService for MockHostService {
    async fn create_issue(&self, title: &str, body: &str) -> Result<Issue> {
        self.create_issue_calls
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        self.record("create_issue")?;

        let number = self.next_issue_number.fetch_add(1, Ordering::SeqCst);
        Ok(Issue {
            number,
            title: title.to_string(),
            html_url: format!("https://github.com/test/repo/issues/{number}"),
            created_at: Utc::now(),
        })
    }

    async fn comment_on_issue(&self, number: u64, body: &str) -> Result<IssueComment> {
        self.issue_comment_calls.lock().unwrap().push(CommentCall {
            number,
            body: body.to_string(),
        });
        self.record("comment_on_issue")?;

        Ok(IssueComment {
            id: self.next_comment_id.fetch_add(1, Ordering::SeqCst),
            created_at: Utc::now(),
        })
    }

    async fn comment_on_pr(&self, number: u64, body: &str) -> Result<IssueComment> {
        self.pr_comment_calls.lock().unwrap().push(CommentCall {
            number,
            body: body.to_string(),
        });
        self.record("comment_on_pr")?;

        Ok(IssueComment {
            id: self.next_comment_id.fetch_add(1, Ordering::SeqCst),
            created_at: Utc::now(),
        })
    }

    async fn branch_head_sha(&self, branch: &str) -> Result<String> {
        self.branch_head_calls
            .lock()
            .unwrap()
            .push(branch.to_string());
        self.record("branch_head_sha")?;
        Ok(format!("sha_of_{branch}"))
    }

    async fn create_branch(&self, name: &str, from_sha: &str) -> Result<()> {
        self.create_branch_calls
            .lock()
            .unwrap()
            .push(CreateBranchCall {
                name: name.to_string(),
                from_sha: from_sha.to_string(),
            });
        self.record("create_branch")
    }

    async fn put_file(
        &self,
        branch: &str,
        path: &str,
        message: &str,
        _content: &str,
    ) -> Result<()> {
        self.put_file_calls.lock().unwrap().push(PutFileCall {
            branch: branch.to_string(),
            path: path.to_string(),
            message: message.to_string(),
        });
        self.record("put_file")
    }

    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        self.record("create_pull_request")?;

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            branch: head.to_string(),
            html_url: format!("https://github.com/test/repo/pull/{number}"),
            created_at: Utc::now(),
        })
    }

    async fn merge_state(&self, pr_number: u64) -> Result<MergeState> {
        self.merge_state_calls.lock().unwrap().push(pr_number);
        self.record("merge_state")?;

        let state = self
            .merge_states
            .lock()
            .unwrap()
            .get_mut(&pr_number)
            .and_then(VecDeque::pop_front)
            .unwrap_or(MergeState::Mergeable);
        Ok(state)
    }

    async fn merge_pull_request(
        &self,
        pr_number: u64,
        title: &str,
        message: &str,
    ) -> Result<MergeResult> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            pr_number,
            title: title.to_string(),
            message: message.to_string(),
        });
        self.record("merge_pull_request")?;

        if self.merge_rejected.lock().unwrap().contains(&pr_number) {
            return Ok(MergeResult {
                merged: false,
                sha: None,
                message: Some("Base branch was modified".to_string()),
                merged_at: Utc::now(),
            });
        }

        Ok(MergeResult {
            merged: true,
            sha: Some(format!("merged_sha_{pr_number}")),
            message: None,
            merged_at: Utc::now(),
        })
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        self.delete_branch_calls
            .lock()
            .unwrap()
            .push(name.to_string());
        self.record("delete_branch")
    }

    fn config(&self) -> &HostConfig {
        &self.config
    }
}
