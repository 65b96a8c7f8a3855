//! Content templating for workflow artifacts
//!
//! Thin text generation for issue/PR titles, bodies, branch names, and
//! commit messages. No decision logic lives here.

use crate::types::Issue;
use chrono::Utc;

/// Title for the iteration's issue
#[must_use]
pub fn issue_title(sequence: u32) -> String {
    format!(
        "Automated check-in #{sequence} - {}",
        Utc::now().format("%Y-%m-%d %H:%M")
    )
}

/// Body for the iteration's issue
#[must_use]
pub fn issue_body() -> String {
    "This issue was opened by octoflow as part of a collaboration workflow run.\n\
     A pull request resolving it will follow shortly."
        .to_string()
}

/// Body for the comment posted on the issue
#[must_use]
pub fn issue_comment_body(issue_number: u64) -> String {
    format!("Acknowledged - preparing a pull request to resolve #{issue_number}.")
}

/// Branch name for the iteration's PR
///
/// Issue numbers are unique per repository, so the branch name is
/// collision-free across runs.
#[must_use]
pub fn branch_name(issue_number: u64) -> String {
    format!("octoflow/issue-{issue_number}")
}

/// Repository path of the file committed on the branch
#[must_use]
pub fn file_path(issue_number: u64) -> String {
    format!("octoflow/issue-{issue_number}.md")
}

/// Contents of the committed file
#[must_use]
pub fn file_content(issue: &Issue) -> String {
    format!(
        "# {}\n\nResolves issue #{} ({}).\nCreated {}.\n",
        issue.title,
        issue.number,
        issue.html_url,
        issue.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Commit message for the branch's single commit
///
/// When a co-author identity is configured, the message carries the
/// `Co-authored-by:` trailer GitHub uses for commit co-attribution.
#[must_use]
pub fn commit_message(issue_number: u64, co_author: Option<&str>) -> String {
    let mut message = format!("Add workflow note for issue #{issue_number}");
    if let Some(co_author) = co_author {
        message.push_str("\n\nCo-authored-by: ");
        message.push_str(co_author);
    }
    message
}

/// Title for the iteration's PR
#[must_use]
pub fn pr_title(issue: &Issue) -> String {
    format!("Resolve: {}", issue.title)
}

/// Body for the iteration's PR
///
/// The `Closes #N` line makes GitHub close the linked issue when the PR
/// merges; the issue-closed counter relies on it.
#[must_use]
pub fn pr_body(issue_number: u64) -> String {
    format!("Closes #{issue_number}\n\nAdds the workflow note for issue #{issue_number}.")
}

/// Body for the PR comment posted when auto-merge is disabled
#[must_use]
pub fn pr_comment_body(issue_number: u64) -> String {
    format!("This pull request resolves #{issue_number} and is ready for review.")
}

/// Body for the pre-merge review comment (reviewed policy only)
#[must_use]
pub fn review_comment_body() -> String {
    "Reviewed - changes look good, merging.".to_string()
}

/// Squash commit message body for the merge
#[must_use]
pub fn merge_commit_message(yolo: bool) -> String {
    if yolo {
        "Merged without review by octoflow.".to_string()
    } else {
        "Reviewed and merged by octoflow.".to_string()
    }
}
