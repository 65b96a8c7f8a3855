//! GitHub hosting service implementation

use crate::error::{Error, Result};
use crate::platform::HostingService;
use crate::types::{HostConfig, Issue, IssueComment, MergeResult, MergeState, PullRequest};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Maximum response-body length quoted in error messages
const ERROR_BODY_MAX_CHARS: usize = 300;

/// GitHub service using octocrab
///
/// Issue, comment, and pull-request operations go through octocrab; the
/// git-data endpoints (ref lookup/creation, contents upsert, ref deletion)
/// use raw HTTP requests because octocrab does not cover them cleanly.
pub struct GitHubService {
    client: Octocrab,
    config: HostConfig,
    /// Token for raw HTTP requests (git-data endpoints)
    token: String,
    /// HTTP client for raw requests (git-data endpoints)
    http_client: Client,
    /// API host for raw requests
    api_host: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_host = if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            format!("{h}/api/v3")
        } else {
            "api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("octoflow")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: HostConfig { owner, repo, host },
            token: token.to_string(),
            http_client,
            api_host,
        })
    }

    /// Build a raw request against `/repos/{owner}/{repo}/{path}`
    fn repo_request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "https://{}/repos/{}/{}/{path}",
            self.api_host, self.config.owner, self.config.repo
        );
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Turn a non-success raw response into an `ApiStatus` error
    async fn status_error(operation: &str, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        Error::ApiStatus {
            operation: operation.to_string(),
            status,
            retry_after,
            message: truncate_for_error(&body),
        }
    }
}

/// Extract a retry-after hint from response headers
///
/// Reads `Retry-After` (seconds) first, then falls back to
/// `x-ratelimit-reset` (epoch seconds, converted to a delta).
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    if let Some(secs) = headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        return Some(Duration::from_secs(secs));
    }

    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())?;
    let delta = reset - Utc::now().timestamp();
    (delta > 0).then(|| Duration::from_secs(delta.unsigned_abs()))
}

/// Truncate a response body for inclusion in an error message
fn truncate_for_error(body: &str) -> String {
    if body.chars().count() <= ERROR_BODY_MAX_CHARS {
        return body.to_string();
    }
    let truncated: String = body.chars().take(ERROR_BODY_MAX_CHARS).collect();
    format!("{truncated}…")
}

#[async_trait]
impl HostingService for GitHubService {
    async fn create_issue(&self, title: &str, body: &str) -> Result<Issue> {
        debug!(title, "creating issue");
        let issue = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .create(title)
            .body(body)
            .send()
            .await?;

        let result = Issue {
            number: issue.number,
            title: issue.title.clone(),
            html_url: issue.html_url.to_string(),
            created_at: issue.created_at,
        };
        debug!(issue_number = result.number, "created issue");
        Ok(result)
    }

    async fn comment_on_issue(&self, number: u64, body: &str) -> Result<IssueComment> {
        debug!(issue_number = number, "creating issue comment");
        let comment = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(number, body)
            .await?;
        debug!(comment_id = comment.id.0, "created issue comment");
        Ok(IssueComment {
            id: comment.id.0,
            created_at: comment.created_at,
        })
    }

    async fn comment_on_pr(&self, number: u64, body: &str) -> Result<IssueComment> {
        debug!(pr_number = number, "creating PR comment");
        // PR comments go through the issues API, same as the issue path
        let comment = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(number, body)
            .await?;
        debug!(comment_id = comment.id.0, "created PR comment");
        Ok(IssueComment {
            id: comment.id.0,
            created_at: comment.created_at,
        })
    }

    async fn branch_head_sha(&self, branch: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct RefObject {
            sha: String,
        }

        #[derive(Deserialize)]
        struct GitRef {
            object: RefObject,
        }

        debug!(branch, "looking up branch head");
        let path = format!("git/ref/heads/{}", urlencoding::encode(branch));
        let response = self
            .repo_request(reqwest::Method::GET, &path)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch ref: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::status_error("ref lookup", response).await);
        }

        let git_ref: GitRef = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse ref: {e}")))?;

        debug!(branch, sha = %git_ref.object.sha, "resolved branch head");
        Ok(git_ref.object.sha)
    }

    async fn create_branch(&self, name: &str, from_sha: &str) -> Result<()> {
        debug!(branch = name, sha = from_sha, "creating branch");
        let response = self
            .repo_request(reqwest::Method::POST, "git/refs")
            .json(&serde_json::json!({
                "ref": format!("refs/heads/{name}"),
                "sha": from_sha,
            }))
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to create ref: {e}")))?;

        // A 422 here means the ref already exists. That is a real failure:
        // the workflow owns its branch names, so a collision breaks the
        // iteration's identity.
        if !response.status().is_success() {
            return Err(Self::status_error("branch creation", response).await);
        }

        debug!(branch = name, "created branch");
        Ok(())
    }

    async fn put_file(
        &self,
        branch: &str,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<()> {
        debug!(branch, path, "upserting file");
        let encoded_path: String = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let response = self
            .repo_request(reqwest::Method::PUT, &format!("contents/{encoded_path}"))
            .json(&serde_json::json!({
                "message": message,
                "content": BASE64.encode(content),
                "branch": branch,
            }))
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to put contents: {e}")))?;

        // 422 means the path already has content at this branch; the write
        // is upsert-by-path, so the postcondition already holds.
        if response.status().as_u16() == 422 {
            debug!(branch, path, "file already present, treating as success");
            return Ok(());
        }

        if !response.status().is_success() {
            return Err(Self::status_error("contents upsert", response).await);
        }

        debug!(branch, path, "upserted file");
        Ok(())
    }

    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        let result = PullRequest {
            number: pr.number,
            branch: pr.head.ref_field.clone(),
            html_url: pr
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            created_at: pr.created_at.unwrap_or_else(Utc::now),
        };
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn merge_state(&self, pr_number: u64) -> Result<MergeState> {
        debug!(pr_number, "checking merge state");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;

        let state = match pr.mergeable {
            Some(true) => MergeState::Mergeable,
            Some(false) => MergeState::Conflicted,
            None => MergeState::Unknown,
        };
        debug!(pr_number, %state, "checked merge state");
        Ok(state)
    }

    async fn merge_pull_request(
        &self,
        pr_number: u64,
        title: &str,
        message: &str,
    ) -> Result<MergeResult> {
        debug!(pr_number, "merging PR");
        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab::params::pulls::MergeMethod::Squash)
            .title(title)
            .message(message)
            .send()
            .await?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
            merged_at: Utc::now(),
        };
        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        debug!(branch = name, "deleting branch");
        let path = format!("git/refs/heads/{}", urlencoding::encode(name));
        let response = self
            .repo_request(reqwest::Method::DELETE, &path)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to delete ref: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::status_error("branch deletion", response).await);
        }

        debug!(branch = name, "deleted branch");
        Ok(())
    }

    fn config(&self) -> &HostConfig {
        &self.config
    }
}
