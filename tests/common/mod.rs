//! Shared test fixtures

#![allow(dead_code)]

mod mock_host;

pub use mock_host::{CommentCall, CreatePrCall, MergeCall, MockHostService, PutFileCall};

use octoflow::config::WorkflowConfig;
use octoflow::types::HostConfig;
use std::path::Path;
use std::time::Duration;

/// Host config pointing at a test repository
pub fn github_config() -> HostConfig {
    HostConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// Workflow config tuned for tests: two iterations, no pauses, fast poll
/// and throttle delays, store/report under the given directory
pub fn test_workflow_config(dir: &Path) -> WorkflowConfig {
    let mut config = WorkflowConfig::new("test".to_string(), "repo".to_string());
    config.max_issues_per_run = 2;
    config.max_prs_per_run = 2;
    config.indexing_pause = Duration::ZERO;
    config.iteration_pause = Duration::ZERO;
    config.poll.interval = Duration::from_millis(10);
    config.throttle.default_delay = Duration::from_millis(10);
    config.store_path = dir.join("analytics.json");
    config.report_path = dir.join("report.txt");
    config
}
