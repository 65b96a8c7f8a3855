//! Workflow configuration
//!
//! Built-in defaults, overridden by an optional `octoflow.toml` (current
//! directory first, then the user config directory), overridden in turn by
//! CLI flags. Durations appear in the file as seconds.

use crate::error::{Error, Result};
use crate::merge::PollPolicy;
use crate::throttle::ThrottlePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Config file name, looked up in the current directory
pub const CONFIG_FILE: &str = "octoflow.toml";

/// Resolved configuration for one workflow run
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
    /// Base branch PRs merge into
    pub base_branch: String,
    /// Cap on issues created per run
    pub max_issues_per_run: u32,
    /// Cap on PRs opened per run
    pub max_prs_per_run: u32,
    /// Whether iterations merge their PRs
    pub auto_merge: bool,
    /// Process-wide merge policy default: merge without a review comment
    pub yolo: bool,
    /// Co-author identity for commit trailers, e.g. "Name <email>"
    pub co_author: Option<String>,
    /// Pause after creating a resource before referencing it
    pub indexing_pause: Duration,
    /// Pause between iterations
    pub iteration_pause: Duration,
    /// Mergeability polling budget and pacing
    pub poll: PollPolicy,
    /// Throttling retry policy
    pub throttle: ThrottlePolicy,
    /// Path of the persisted analytics store
    pub store_path: PathBuf,
    /// Path of the regenerated report artifact
    pub report_path: PathBuf,
}

impl WorkflowConfig {
    /// Create a configuration with built-in defaults for a repository
    #[must_use]
    pub fn new(owner: String, repo: String) -> Self {
        Self {
            owner,
            repo,
            host: None,
            base_branch: "main".to_string(),
            max_issues_per_run: 3,
            max_prs_per_run: 3,
            auto_merge: true,
            yolo: false,
            co_author: None,
            indexing_pause: Duration::from_millis(2000),
            iteration_pause: Duration::from_millis(3000),
            poll: PollPolicy::default(),
            throttle: ThrottlePolicy::default(),
            store_path: default_store_path(),
            report_path: default_report_path(),
        }
    }

    /// Iterations for one run
    ///
    /// Each iteration produces exactly one issue and at most one PR, so the
    /// bound is the minimum of the two caps, not their sum.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        if self.max_issues_per_run < self.max_prs_per_run {
            self.max_issues_per_run
        } else {
            self.max_prs_per_run
        }
    }

    /// Load configuration: defaults, then the config file, for the given
    /// repository slug (required here or in the file).
    pub fn load(repo_slug: Option<&str>) -> Result<Self> {
        let file = ConfigFile::find_and_parse()?;

        let slug = repo_slug
            .map(ToString::to_string)
            .or_else(|| file.repo.clone())
            .ok_or_else(|| {
                Error::Config(
                    "no repository configured; pass --repo owner/name or set repo in octoflow.toml"
                        .to_string(),
                )
            })?;
        let (owner, repo) = parse_repo_slug(&slug)?;

        let mut config = Self::new(owner, repo);
        file.apply(&mut config)?;
        Ok(config)
    }
}

/// Parse an `owner/name` repository slug
pub fn parse_repo_slug(raw: &str) -> Result<(String, String)> {
    let trimmed = raw.trim();
    let (owner, name) = trimmed
        .split_once('/')
        .ok_or_else(|| Error::Config(format!("invalid repo '{raw}', expected owner/name")))?;
    let owner = owner.trim();
    let name = name.trim();
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return Err(Error::Config(format!(
            "invalid repo '{raw}', expected owner/name"
        )));
    }
    Ok((owner.to_string(), name.to_string()))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("octoflow")
}

/// Default path of the persisted analytics store
#[must_use]
pub fn default_store_path() -> PathBuf {
    default_data_dir().join("analytics.json")
}

/// Default path of the regenerated report artifact
#[must_use]
pub fn default_report_path() -> PathBuf {
    default_data_dir().join("report.txt")
}

/// On-disk configuration file shape (all fields optional)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    repo: Option<String>,
    host: Option<String>,
    base_branch: Option<String>,
    max_issues_per_run: Option<u32>,
    max_prs_per_run: Option<u32>,
    auto_merge: Option<bool>,
    yolo: Option<bool>,
    co_author: Option<String>,
    indexing_pause_secs: Option<f64>,
    iteration_pause_secs: Option<f64>,
    poll_attempts: Option<u32>,
    poll_interval_secs: Option<f64>,
    throttle_delay_secs: Option<f64>,
    store_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
}

impl ConfigFile {
    /// Locate and parse the config file; absent file yields defaults
    fn find_and_parse() -> Result<Self> {
        let candidates = [
            Some(PathBuf::from(CONFIG_FILE)),
            dirs::config_dir().map(|d| d.join("octoflow").join("config.toml")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "loading config file");
                return Self::parse_file(&path);
            }
        }

        Ok(Self::default())
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Overlay file values onto the defaults
    fn apply(self, config: &mut WorkflowConfig) -> Result<()> {
        if let Some(host) = self.host {
            config.host = Some(host);
        }
        if let Some(base_branch) = self.base_branch {
            config.base_branch = base_branch;
        }
        if let Some(max_issues) = self.max_issues_per_run {
            config.max_issues_per_run = max_issues;
        }
        if let Some(max_prs) = self.max_prs_per_run {
            config.max_prs_per_run = max_prs;
        }
        if let Some(auto_merge) = self.auto_merge {
            config.auto_merge = auto_merge;
        }
        if let Some(yolo) = self.yolo {
            config.yolo = yolo;
        }
        if let Some(co_author) = self.co_author {
            config.co_author = Some(co_author);
        }
        if let Some(secs) = self.indexing_pause_secs {
            config.indexing_pause = duration_from_secs("indexing_pause_secs", secs)?;
        }
        if let Some(secs) = self.iteration_pause_secs {
            config.iteration_pause = duration_from_secs("iteration_pause_secs", secs)?;
        }
        if let Some(attempts) = self.poll_attempts {
            config.poll.attempts = attempts;
        }
        if let Some(secs) = self.poll_interval_secs {
            config.poll.interval = duration_from_secs("poll_interval_secs", secs)?;
        }
        if let Some(secs) = self.throttle_delay_secs {
            config.throttle.default_delay = duration_from_secs("throttle_delay_secs", secs)?;
        }
        if let Some(store_path) = self.store_path {
            config.store_path = store_path;
        }
        if let Some(report_path) = self.report_path {
            config.report_path = report_path;
        }
        Ok(())
    }
}

fn duration_from_secs(field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| Error::Config(format!("{field} must be a non-negative number of seconds")))
}
