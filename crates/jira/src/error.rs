//! Errors produced by the Jira adapter.

use std::time::Duration;

use release::{BoardId, IssueId, LookupError};
use thiserror::Error;

/// Longest response body kept in [`JiraError::Status`].
pub(crate) const MAX_ERROR_BODY: usize = 512;

/// Failure talking to Jira.
#[derive(Debug, Error)]
pub enum JiraError {
    /// The configuration cannot produce a working client.
    #[error("invalid Jira configuration: {message}")]
    InvalidConfig {
        /// What is wrong with it.
        message: String,
    },

    /// The request did not produce a response.
    #[error("request to Jira failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Jira rejected the credentials (HTTP 401 or 403).
    #[error("Jira rejected the credentials (HTTP {status})")]
    Unauthorized {
        /// The status Jira returned.
        status: u16,
    },

    /// The requested resource does not exist (HTTP 404).
    #[error("Jira resource not found: {resource}")]
    NotFound {
        /// Path of the missing resource.
        resource: String,
    },

    /// Jira throttled the request (HTTP 429).
    #[error("rate limited by Jira")]
    RateLimited {
        /// Delay from the `Retry-After` header, when present.
        retry_after: Option<Duration>,
    },

    /// Any other non-success status.
    #[error("Jira returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated to a few hundred bytes.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {resource}: {message}")]
    Decode {
        /// Path of the resource that was decoded.
        resource: String,
        /// Decoder error description.
        message: String,
    },

    /// No board matched the requested name.
    #[error("no board named '{name}'")]
    BoardNotFound {
        /// Requested board name.
        name: String,
    },

    /// The board is not attached to any project.
    #[error("board {board_id} has no project")]
    ProjectNotFound {
        /// Board that was inspected.
        board_id: BoardId,
    },
}

impl JiraError {
    /// Converts this error into the lookup port's error for `issue_id`.
    pub fn into_lookup_error(self, issue_id: &IssueId) -> LookupError {
        match self {
            Self::Transport(err) => LookupError::Transport {
                message: err.to_string(),
            },
            Self::Unauthorized { .. } => LookupError::Unauthorized,
            Self::NotFound { .. } => LookupError::NotFound {
                issue_id: issue_id.clone(),
            },
            Self::RateLimited { retry_after } => LookupError::RateLimited { retry_after },
            Self::Status { status, body } => LookupError::Status { status, body },
            Self::Decode { message, .. } => LookupError::Malformed { message },
            other @ (Self::InvalidConfig { .. }
            | Self::BoardNotFound { .. }
            | Self::ProjectNotFound { .. }) => LookupError::Malformed {
                message: other.to_string(),
            },
        }
    }
}

/// Cuts `body` down to at most [`MAX_ERROR_BODY`] bytes on a char boundary.
pub(crate) fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
