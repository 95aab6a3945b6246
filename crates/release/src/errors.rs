//! Error and retry-policy types for the release-notes domain.
//!
//! [`ReleaseError`] covers conditions that fail a branch aggregation as a
//! whole. [`LookupError`] is the error a single [`crate::BranchLookup`]
//! invocation reports; infrastructure adapters convert their own errors into
//! it.
//!
//! [`RetryPolicy`] is a cross-cutting concern: a lookup error says whether
//! re-running is likely to help, but the engine itself never retries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::IssueId;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt (e.g. from `Retry-After`).
        /// `None` means the caller applies its own schedule.
        after: Option<Duration>,
    },
    /// Retrying will not help; credentials, configuration, or the request
    /// itself must change first.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Lookup errors
// ---------------------------------------------------------------------------

/// Failure of one per-issue branch lookup.
///
/// Lookups must report transport and authentication problems through this
/// type rather than returning an empty branch list.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    /// The request never produced a response (DNS, TLS, connection reset,
    /// timeout).
    #[error("transport failure: {message}")]
    Transport {
        /// Underlying transport error description.
        message: String,
    },

    /// The tracker rejected the credentials.
    #[error("not authorised to read branch information")]
    Unauthorized,

    /// The tracker does not know the issue.
    #[error("issue {issue_id} not found")]
    NotFound {
        /// Issue that was looked up.
        issue_id: IssueId,
    },

    /// The tracker throttled the request.
    #[error("rate limited by the tracker")]
    RateLimited {
        /// Back-off requested by the tracker, when it sent one.
        retry_after: Option<Duration>,
    },

    /// Any other non-success response.
    #[error("tracker returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },

    /// The response arrived but could not be decoded.
    #[error("malformed branch response: {message}")]
    Malformed {
        /// Decoder error description.
        message: String,
    },
}

impl LookupError {
    /// Classifies this error for callers deciding whether to re-run.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport { .. } => RetryPolicy::Retryable { after: None },
            Self::RateLimited { retry_after } => RetryPolicy::Retryable {
                after: *retry_after,
            },
            Self::Status { status, .. } if *status >= 500 => {
                RetryPolicy::Retryable { after: None }
            }
            Self::Unauthorized
            | Self::NotFound { .. }
            | Self::Status { .. }
            | Self::Malformed { .. } => RetryPolicy::NonRetryable,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation-level errors
// ---------------------------------------------------------------------------

/// Errors that fail a whole branch aggregation.
///
/// Classification, bucketing and sorting never produce these; malformed
/// issues are defaulted in place.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// A per-issue lookup failed.
    ///
    /// Lookups already in flight when this happened were allowed to finish;
    /// no further lookups were started and no partial branch list is
    /// returned.
    #[error("branch lookup for issue {issue_id} failed: {source}")]
    LookupFailure {
        /// Issue whose lookup failed first.
        issue_id: IssueId,
        /// The lookup's own error.
        #[source]
        source: LookupError,
    },

    /// The dispatcher lost track of a lookup (a worker panicked or was
    /// cancelled, or the settled count did not match the dispatched count).
    #[error("branch aggregation incomplete: {reason}")]
    AggregationIncomplete {
        /// Description of the bookkeeping violation.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_throttling_are_retryable() {
        let throttled = LookupError::RateLimited {
            retry_after: Some(Duration::from_secs(3)),
        };
        assert_eq!(
            throttled.retry_policy(),
            RetryPolicy::Retryable {
                after: Some(Duration::from_secs(3))
            }
        );

        let unavailable = LookupError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(matches!(
            unavailable.retry_policy(),
            RetryPolicy::Retryable { after: None }
        ));
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert_eq!(
            LookupError::Unauthorized.retry_policy(),
            RetryPolicy::NonRetryable
        );
        let bad_request = LookupError::Status {
            status: 400,
            body: "bad jql".into(),
        };
        assert_eq!(bad_request.retry_policy(), RetryPolicy::NonRetryable);
    }

    #[test]
    fn lookup_failure_names_the_issue() {
        let err = ReleaseError::LookupFailure {
            issue_id: IssueId::new("10001").unwrap(),
            source: LookupError::Unauthorized,
        };
        assert_eq!(
            err.to_string(),
            "branch lookup for issue 10001 failed: not authorised to read branch information"
        );
    }
}
