//! relnotes Jira infrastructure adapter.
//!
//! Implements the [`release::BranchLookup`] port over Jira Cloud's
//! dev-status API, and exposes the board, project, status and issue-search
//! calls the CLI needs to assemble the issue list.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! Authentication, pagination, HTTP status mapping and response decoding are
//! handled here; the [`release`] crate never sees them.
//!
//! ## Endpoints
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`JiraClient::boards`] | `GET rest/agile/1.0/board` (paginated) |
//! | [`JiraClient::board_project`] | `GET rest/agile/1.0/board/{id}/project` |
//! | [`JiraClient::statuses`] | `GET rest/api/2/status` |
//! | [`JiraClient::search_issues`] | `GET rest/api/2/search` (paginated) |
//! | [`JiraClient::issue_branches`] | `GET rest/dev-status/latest/issue/detail` |

mod client;
mod config;
mod dto;
mod error;

pub use client::JiraClient;
pub use config::{JiraConfig, DEFAULT_DEV_STATUS_APPLICATION, DEFAULT_REQUEST_TIMEOUT};
pub use dto::{Board, Project, Status};
pub use error::JiraError;
