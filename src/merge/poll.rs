//! Mergeability polling
//!
//! GitHub computes a PR's mergeability lazily, so the answer right after
//! opening a PR is usually "unknown". This loop polls until the state
//! settles or a bounded attempt budget runs out, and fails safe (do not
//! merge) when the remote never confirms.

use crate::error::Result;
use crate::platform::HostingService;
use crate::throttle::{ThrottlePolicy, call_with_backoff};
use crate::types::MergeState;
use std::time::Duration;
use tracing::{debug, warn};

/// Polling budget and pacing
///
/// The defaults (5 attempts, 3 s apart) give GitHub ~12 s to settle a
/// freshly opened PR, which is comfortably above its usual computation time.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Maximum number of polls before failing safe
    pub attempts: u32,
    /// Sleep between consecutive polls
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            interval: Duration::from_secs(3),
        }
    }
}

/// Poll a PR's merge state until it settles or the budget is exhausted
///
/// `Mergeable` and `Conflicted` return immediately; `Unknown` keeps
/// polling. If the budget runs out while still `Unknown`, the answer is
/// `false`: never merge on an unconfirmed state. Each poll goes through
/// the rate-limit executor; transport failures propagate as errors and are
/// not retried by this loop.
pub async fn wait_for_mergeable(
    host: &dyn HostingService,
    throttle: &ThrottlePolicy,
    pr_number: u64,
    policy: &PollPolicy,
) -> Result<bool> {
    for attempt in 1..=policy.attempts {
        let state = call_with_backoff("merge state check", throttle, || {
            host.merge_state(pr_number)
        })
        .await?;

        match state {
            MergeState::Mergeable => {
                debug!(pr_number, attempt, "PR is mergeable");
                return Ok(true);
            }
            MergeState::Conflicted => {
                debug!(pr_number, attempt, "PR has conflicts");
                return Ok(false);
            }
            MergeState::Unknown => {
                debug!(pr_number, attempt, "merge state not yet computed");
                if attempt < policy.attempts {
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }
    }

    warn!(
        pr_number,
        attempts = policy.attempts,
        "merge state still unknown after poll budget, treating as not mergeable"
    );
    Ok(false)
}
