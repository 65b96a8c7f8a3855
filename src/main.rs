//! octoflow CLI entry point

mod cli;

use clap::{Parser, Subcommand};
use cli::run::RunOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "octoflow",
    version,
    about = "Drives a repeatable issue → PR → merge collaboration workflow against GitHub"
)]
struct Cli {
    /// Repository slug, e.g. owner/name
    #[arg(long, global = true)]
    repo: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the collaboration workflow
    Run {
        /// Cap on issues created this run
        #[arg(long)]
        max_issues: Option<u32>,

        /// Cap on PRs opened this run
        #[arg(long)]
        max_prs: Option<u32>,

        /// Merge each PR once the remote confirms mergeability
        #[arg(long, overrides_with = "no_auto_merge")]
        auto_merge: bool,

        /// Leave PRs open instead of merging
        #[arg(long)]
        no_auto_merge: bool,

        /// Merge without posting review comments
        #[arg(long)]
        yolo: bool,

        /// Skip confirmation prompts
        #[arg(long, short = 'y')]
        yes: bool,

        /// Analytics store path
        #[arg(long)]
        store: Option<PathBuf>,

        /// Report artifact path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show aggregate analytics across all recorded runs
    Stats {
        /// Analytics store path
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Show which GitHub token source would be used
    Auth,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    match args.command {
        Command::Run {
            max_issues,
            max_prs,
            auto_merge,
            no_auto_merge,
            yolo,
            yes,
            store,
            report,
        } => {
            let auto_merge = if no_auto_merge {
                Some(false)
            } else if auto_merge {
                Some(true)
            } else {
                None
            };
            let options = RunOptions {
                max_issues,
                max_prs,
                auto_merge,
                yolo,
                yes,
                store,
                report,
            };
            cli::run::run_workflow(args.repo.as_deref(), options).await?;
        }
        Command::Stats { store } => cli::stats::run_stats(store),
        Command::Auth => cli::run_auth()?,
    }

    Ok(())
}
