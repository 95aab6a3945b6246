//! HTTP client for the Jira REST, agile and dev-status APIs.

use std::time::Duration;

use async_trait::async_trait;
use release::{
    BoardId, BranchDescriptor, BranchLookup, Issue, IssueId, LookupError, ProjectKey, RepoFilter,
};
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::dto::{Board, BoardPage, DevStatusDetail, Project, ProjectPage, SearchPage, Status};
use crate::error::truncate_body;
use crate::{JiraConfig, JiraError};

/// Page size requested from paginated endpoints.
const PAGE_SIZE: usize = 50;

const BOARDS_PATH: &str = "rest/agile/1.0/board";
const STATUSES_PATH: &str = "rest/api/2/status";
const SEARCH_PATH: &str = "rest/api/2/search";
const DEV_STATUS_PATH: &str = "rest/dev-status/latest/issue/detail";

/// Issue fields requested from search; everything else is left on the server.
const SEARCH_FIELDS: &str = "issuetype,priority,summary,description,created,updated";

/// Authenticated Jira Cloud client.
///
/// Cheap to share behind an `Arc`; the underlying `reqwest::Client` pools
/// connections across concurrent branch lookups.
pub struct JiraClient {
    http: Client,
    base_url: Url,
    username: String,
    api_token: SecretString,
    dev_status_application: String,
}

impl JiraClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// [`JiraError::InvalidConfig`] if the base URL cannot be resolved or the
    /// HTTP client cannot be constructed.
    pub fn new(config: JiraConfig) -> Result<Self, JiraError> {
        let base_url = config.resolved_base_url()?;
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("relnotes/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JiraError::InvalidConfig {
                message: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url,
            username: config.username,
            api_token: config.api_token,
            dev_status_application: config.dev_status_application,
        })
    }

    // -----------------------------------------------------------------------
    // Boards and projects
    // -----------------------------------------------------------------------

    /// Lists every board visible to the user.
    #[tracing::instrument(skip(self))]
    pub async fn boards(&self) -> Result<Vec<Board>, JiraError> {
        let mut boards = Vec::new();
        loop {
            let query = [
                ("startAt", boards.len().to_string()),
                ("maxResults", PAGE_SIZE.to_string()),
            ];
            let page: BoardPage = self.get_json(BOARDS_PATH, &query).await?;
            let fetched = page.values.len();
            boards.extend(page.values);
            if page.is_last || fetched == 0 {
                break;
            }
        }
        debug!(count = boards.len(), "Fetched boards");
        Ok(boards)
    }

    /// Finds the board whose slug-normalised name equals `name`'s.
    ///
    /// # Errors
    ///
    /// [`JiraError::BoardNotFound`] if no board matches.
    #[tracing::instrument(skip(self))]
    pub async fn find_board(&self, name: &str) -> Result<Board, JiraError> {
        let wanted = slug::slugify(name);
        self.boards()
            .await?
            .into_iter()
            .find(|board| slug::slugify(&board.name) == wanted)
            .ok_or_else(|| JiraError::BoardNotFound {
                name: name.to_string(),
            })
    }

    /// Returns the first project attached to `board_id`.
    ///
    /// # Errors
    ///
    /// [`JiraError::ProjectNotFound`] if the board has no project.
    #[tracing::instrument(skip_all, fields(board_id = %board_id))]
    pub async fn board_project(&self, board_id: BoardId) -> Result<Project, JiraError> {
        let path = format!("{BOARDS_PATH}/{board_id}/project");
        let page: ProjectPage = self.get_json(&path, &[]).await?;
        page.values
            .into_iter()
            .next()
            .ok_or(JiraError::ProjectNotFound { board_id })
    }

    // -----------------------------------------------------------------------
    // Statuses and issues
    // -----------------------------------------------------------------------

    /// Lists every workflow status on the site.
    #[tracing::instrument(skip(self))]
    pub async fn statuses(&self) -> Result<Vec<Status>, JiraError> {
        self.get_json(STATUSES_PATH, &[]).await
    }

    /// Returns every issue in `project` currently in `status`, following
    /// search pagination to the end.
    #[tracing::instrument(skip_all, fields(project = %project, status = %status))]
    pub async fn search_issues(
        &self,
        project: &ProjectKey,
        status: &str,
    ) -> Result<Vec<Issue>, JiraError> {
        let jql = issues_jql(project, status);
        let mut issues = Vec::new();
        loop {
            let query = [
                ("jql", jql.clone()),
                ("startAt", issues.len().to_string()),
                ("maxResults", PAGE_SIZE.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
            ];
            let page: SearchPage = self.get_json(SEARCH_PATH, &query).await?;
            let fetched = page.issues.len();
            for dto in page.issues {
                issues.push(dto.into_issue(SEARCH_PATH)?);
            }
            if fetched == 0 || issues.len() >= page.total {
                break;
            }
        }
        info!(count = issues.len(), "Fetched issues");
        Ok(issues)
    }

    // -----------------------------------------------------------------------
    // Dev-status
    // -----------------------------------------------------------------------

    /// Returns the branches linked to `issue_id` that pass `filter`.
    #[tracing::instrument(skip_all, fields(issue_id = %issue_id, repo = %filter))]
    pub async fn issue_branches(
        &self,
        issue_id: &IssueId,
        filter: &RepoFilter,
    ) -> Result<Vec<BranchDescriptor>, JiraError> {
        let query = [
            ("issueId", issue_id.to_string()),
            ("applicationType", self.dev_status_application.clone()),
            ("dataType", "branch".to_string()),
        ];
        let detail: DevStatusDetail = self.get_json(DEV_STATUS_PATH, &query).await?;
        if !detail.errors.is_empty() {
            debug!(errors = ?detail.errors, "Dev-status reported integration errors");
        }
        let branches = filter.retain(detail.into_branches());
        debug!(count = branches.len(), "Fetched branches");
        Ok(branches)
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, JiraError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| JiraError::InvalidConfig {
                message: format!("cannot join '{path}' onto {}: {e}", self.base_url),
            })?;

        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(self.api_token.expose_secret()))
            .query(query)
            .send()
            .await
            .map_err(JiraError::Transport)?;

        let response = check_status(path, response).await?;
        let body = response.text().await.map_err(JiraError::Transport)?;
        serde_json::from_str(&body).map_err(|e| JiraError::Decode {
            resource: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl BranchLookup for JiraClient {
    async fn branches(
        &self,
        issue_id: &IssueId,
        filter: &RepoFilter,
    ) -> Result<Vec<BranchDescriptor>, LookupError> {
        self.issue_branches(issue_id, filter)
            .await
            .map_err(|e| e.into_lookup_error(issue_id))
    }
}

/// Maps non-success statuses to [`JiraError`].
async fn check_status(path: &str, response: Response) -> Result<Response, JiraError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(JiraError::Unauthorized {
            status: status.as_u16(),
        }),
        StatusCode::NOT_FOUND => Err(JiraError::NotFound {
            resource: path.to_string(),
        }),
        StatusCode::TOO_MANY_REQUESTS => Err(JiraError::RateLimited {
            retry_after: retry_after(&response),
        }),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(JiraError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            })
        }
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// JQL selecting a project's issues in one status.
pub(crate) fn issues_jql(project: &ProjectKey, status: &str) -> String {
    format!(
        "project = \"{}\" AND status = \"{}\"",
        escape_jql(project.as_str()),
        escape_jql(status)
    )
}

fn escape_jql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jql_quotes_project_and_status() {
        let project = ProjectKey::new("GM").unwrap();
        assert_eq!(
            issues_jql(&project, "Ready For Handoff"),
            r#"project = "GM" AND status = "Ready For Handoff""#
        );
    }

    #[test]
    fn jql_escapes_embedded_quotes() {
        let project = ProjectKey::new("GM").unwrap();
        assert_eq!(
            issues_jql(&project, r#"Say "done""#),
            r#"project = "GM" AND status = "Say \"done\"""#
        );
    }
}
