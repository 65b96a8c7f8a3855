//! Stats command - show aggregate analytics without running a workflow

use crate::cli::style::Stylize;
use anstream::println;
use octoflow::analytics::{format_duration_ms, load_store, summarize};
use octoflow::config::default_store_path;
use std::path::PathBuf;

/// Run the stats command
pub fn run_stats(store: Option<PathBuf>) {
    let path = store.unwrap_or_else(default_store_path);
    let store = load_store(&path);
    let summary = summarize(&store);

    if summary.runs == 0 {
        println!("{}", "No runs recorded yet.".muted());
        println!("{}", format!("Store: {}", path.display()).muted());
        return;
    }

    println!("{}", "Workflow analytics".emphasis());
    println!();
    println!("   runs recorded:       {}", summary.runs.accent());
    println!("   issues created:      {}", summary.issues_created.accent());
    println!("   issues closed:       {}", summary.issues_closed.accent());
    println!("   PRs opened:          {}", summary.prs_opened.accent());
    println!("   PRs merged:          {}", summary.prs_merged.accent());
    println!("   YOLO merges:         {}", summary.yolo_merges.accent());
    println!("   comments posted:     {}", summary.comments_posted.accent());
    println!(
        "   co-authored commits: {}",
        summary.co_authored_commits.accent()
    );
    println!();
    println!(
        "   avg issue -> first comment:  {}",
        format_duration_ms(summary.avg_issue_response_ms).accent()
    );
    println!(
        "   avg PR open -> merge:        {}",
        format_duration_ms(summary.avg_pr_merge_ms).accent()
    );
    println!();
    println!("{}", format!("Store: {}", path.display()).muted());
}
