//! CLI commands for octoflow

pub mod context;
pub mod run;
pub mod stats;
pub mod style;

use anstream::println;
use async_trait::async_trait;
use indicatif::ProgressBar;
use octoflow::error::Result;
use octoflow::workflow::ProgressCallback;
use std::time::Duration;
use style::{Stylize, check, spinner_style};

/// Progress reporter that logs each step above a live spinner
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Create a compact progress reporter
    #[must_use]
    pub fn compact() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Stop the spinner with a final message
    pub fn finish(&self, message: &str) {
        self.spinner.finish_with_message(message.to_string());
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        // Keep a permanent log line and show the latest step on the spinner
        self.spinner.println(message);
        self.spinner.set_message(message.to_string());
    }
}

/// Report which GitHub token source would be used
pub fn run_auth() -> Result<()> {
    let auth = octoflow::auth::resolve_github_token()?;
    println!("{} GitHub token found ({})", check(), auth.source.accent());
    Ok(())
}
