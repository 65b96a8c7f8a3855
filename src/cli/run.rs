//! Run command - execute one bounded workflow run

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use dialoguer::Confirm;
use octoflow::analytics::{Analytics, format_duration_ms, load_store, summarize};
use octoflow::error::{Error, Result};
use octoflow::types::RunRecord;
use octoflow::workflow::Workflow;
use std::path::PathBuf;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Override the cap on issues created this run
    pub max_issues: Option<u32>,
    /// Override the cap on PRs opened this run
    pub max_prs: Option<u32>,
    /// Override whether PRs are merged once mergeable
    pub auto_merge: Option<bool>,
    /// Merge without posting review comments
    pub yolo: bool,
    /// Skip confirmation prompts
    pub yes: bool,
    /// Override the analytics store path
    pub store: Option<PathBuf>,
    /// Override the report artifact path
    pub report: Option<PathBuf>,
}

/// Run the workflow command
pub async fn run_workflow(repo: Option<&str>, options: RunOptions) -> Result<()> {
    let mut ctx = CommandContext::new(repo)?;

    // CLI flags override file/default configuration
    if let Some(max_issues) = options.max_issues {
        ctx.config.max_issues_per_run = max_issues;
    }
    if let Some(max_prs) = options.max_prs {
        ctx.config.max_prs_per_run = max_prs;
    }
    if let Some(auto_merge) = options.auto_merge {
        ctx.config.auto_merge = auto_merge;
    }
    if options.yolo {
        ctx.config.yolo = true;
    }
    if let Some(store) = options.store {
        ctx.config.store_path = store;
    }
    if let Some(report) = options.report {
        ctx.config.report_path = report;
    }

    // YOLO merges leave no review trail; make sure that is intentional
    if ctx.config.yolo && ctx.config.auto_merge && !options.yes {
        let confirmed = Confirm::new()
            .with_prompt("YOLO merges land without any review comment. Proceed?")
            .default(false)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?;
        if !confirmed {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
    }

    println!(
        "{} {} iteration(s) against {}",
        "Running".emphasis(),
        ctx.config.iterations().accent(),
        format!("{}/{}", ctx.config.owner, ctx.config.repo).accent()
    );

    let mut analytics = Analytics::new(
        ctx.config.store_path.clone(),
        ctx.config.report_path.clone(),
    );
    let progress = CliProgress::compact();
    let workflow = Workflow::new(ctx.host.as_ref(), &ctx.config, &mut analytics, &progress);
    let record = workflow.run().await?;
    progress.finish("Run complete");

    print_run_summary(&record);

    // Aggregate view across all recorded runs, including this one
    let store = load_store(&ctx.config.store_path);
    let summary = summarize(&store);
    println!();
    println!("{}", "Across all runs:".emphasis());
    println!(
        "   runs: {}   issues: {}   PRs merged: {}",
        summary.runs.accent(),
        summary.issues_created.accent(),
        summary.prs_merged.accent()
    );
    println!(
        "   avg issue -> first comment:  {}",
        format_duration_ms(summary.avg_issue_response_ms).accent()
    );
    println!(
        "   avg PR open -> merge:        {}",
        format_duration_ms(summary.avg_pr_merge_ms).accent()
    );
    println!();
    println!(
        "{}",
        format!("Report: {}", ctx.config.report_path.display()).muted()
    );

    Ok(())
}

/// Print this run's counts
fn print_run_summary(record: &RunRecord) {
    println!();
    println!("{} Run complete!", check());
    println!("   issues created:      {}", record.issues_created.accent());
    println!("   comments posted:     {}", record.comments_posted.accent());
    println!("   PRs opened:          {}", record.prs_opened.accent());
    println!("   PRs merged:          {}", record.prs_merged.accent());
    if record.yolo_merges > 0 {
        println!("   YOLO merges:         {}", record.yolo_merges.warn());
    }
    if record.co_authored_commits > 0 {
        println!(
            "   co-authored commits: {}",
            record.co_authored_commits.accent()
        );
    }
}
