//! Bounded-concurrency branch aggregation.
//!
//! [`fetch_branches`] runs one [`BranchLookup`] per issue with at most
//! [`ConcurrencyLimit`] lookups in flight. A single coordinator owns the work
//! queue, the task set and the accumulator; workers hand their result back
//! through the task set instead of touching shared state.
//!
//! ## Ordering
//!
//! Lookups are *started* in input order. Branch names are appended in the
//! order lookups *complete*, which depends on the tracker's latency. Callers
//! must not rely on the result mirroring issue order.
//!
//! ## Failure policy: drain without refill
//!
//! When a lookup fails, lookups already in flight are left to finish but no
//! queued issue is dispatched, and the aggregation returns the first failure.
//! No partial branch list is returned.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{
    BranchDescriptor, BranchLookup, BranchName, ConcurrencyLimit, Issue, IssueId, LookupError,
    ReleaseError, RepoFilter,
};

type LookupOutcome = (IssueId, Result<Vec<BranchDescriptor>, LookupError>);

/// Looks up the branches of every issue and returns their names.
///
/// `issues` should already be in dispatch order (see
/// [`crate::sort::sort_by_last_commit`]). Duplicate branch names are kept.
///
/// # Errors
///
/// - [`ReleaseError::LookupFailure`] for the first lookup that failed.
/// - [`ReleaseError::AggregationIncomplete`] if a worker task panicked or was
///   cancelled, or if not every issue was accounted for.
#[tracing::instrument(skip_all, fields(limit = %limit, repo = %filter))]
pub async fn fetch_branches<'a, I, L>(
    issues: I,
    filter: &RepoFilter,
    lookup: Arc<L>,
    limit: ConcurrencyLimit,
) -> Result<Vec<BranchName>, ReleaseError>
where
    I: IntoIterator<Item = &'a Issue>,
    L: BranchLookup + ?Sized + 'static,
{
    let mut queue: VecDeque<IssueId> = issues.into_iter().map(|issue| issue.id.clone()).collect();
    let total = queue.len();

    let mut in_flight: JoinSet<LookupOutcome> = JoinSet::new();
    let mut branches: Vec<BranchName> = Vec::new();
    let mut failure: Option<ReleaseError> = None;
    let mut settled = 0usize;

    loop {
        if failure.is_none() {
            while in_flight.len() < limit.get() {
                let Some(issue_id) = queue.pop_front() else {
                    break;
                };
                debug!(issue_id = %issue_id, active = in_flight.len() + 1, "Dispatching branch lookup");

                let lookup = Arc::clone(&lookup);
                let filter = filter.clone();
                in_flight.spawn(async move {
                    let result = lookup.branches(&issue_id, &filter).await;
                    (issue_id, result)
                });
            }
        }

        let Some(joined) = in_flight.join_next().await else {
            break;
        };
        settled += 1;

        match joined {
            Ok((issue_id, Ok(found))) => {
                debug!(issue_id = %issue_id, count = found.len(), "Branch lookup settled");
                branches.extend(found.into_iter().map(|branch| branch.name));
            }
            Ok((issue_id, Err(source))) => {
                warn!(
                    issue_id = %issue_id,
                    error = %source,
                    queued = queue.len(),
                    "Branch lookup failed; draining in-flight lookups"
                );
                if failure.is_none() {
                    failure = Some(ReleaseError::LookupFailure { issue_id, source });
                }
            }
            Err(join_error) => {
                warn!(error = %join_error, "Branch lookup task did not complete");
                if failure.is_none() {
                    failure = Some(ReleaseError::AggregationIncomplete {
                        reason: format!("lookup task lost: {join_error}"),
                    });
                }
            }
        }
    }

    if let Some(err) = failure {
        return Err(err);
    }

    if settled != total || !queue.is_empty() {
        return Err(ReleaseError::AggregationIncomplete {
            reason: format!(
                "{settled} of {total} lookups settled, {} still queued",
                queue.len()
            ),
        });
    }

    info!(issues = total, branches = branches.len(), "Branch aggregation complete");
    Ok(branches)
}
