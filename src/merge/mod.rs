//! Merge engine for workflow pull requests
//!
//! Two pieces:
//! 1. Poll - resolve GitHub's asynchronous mergeability computation to a
//!    definitive answer within a bounded attempt budget
//! 2. Execute - perform the reviewed or YOLO merge and clean up the branch

mod execute;
mod poll;

pub use execute::{MergeRequest, execute_merge};
pub use poll::{PollPolicy, wait_for_mergeable};
