//! Wire shapes of the Jira responses the adapter reads, and their mapping
//! onto [`release`] domain types.
//!
//! Only the fields the adapter uses are declared; serde ignores the rest.

use release::{
    BoardId, BranchDescriptor, BranchName, Issue, IssueId, IssueKey, LastCommit, ProjectKey,
    Repository, RepositoryName, Timestamp,
};
use serde::Deserialize;
use tracing::warn;

use crate::JiraError;

// ---------------------------------------------------------------------------
// Agile API: boards and their projects
// ---------------------------------------------------------------------------

/// One page of `GET rest/agile/1.0/board`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BoardPage {
    #[serde(default)]
    pub values: Vec<Board>,
    #[serde(default = "default_true")]
    pub is_last: bool,
}

/// An agile board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Board {
    /// Board id.
    pub id: BoardId,
    /// Display name.
    pub name: String,
    /// Board kind (`"scrum"`, `"kanban"`, ...).
    #[serde(rename = "type", default)]
    pub board_type: Option<String>,
}

/// `GET rest/agile/1.0/board/{id}/project`.
#[derive(Debug, Deserialize)]
pub(crate) struct ProjectPage {
    #[serde(default)]
    pub values: Vec<Project>,
}

/// A Jira project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    /// Project id.
    pub id: String,
    /// Project key, used in JQL.
    pub key: ProjectKey,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

// ---------------------------------------------------------------------------
// Platform API: statuses and issue search
// ---------------------------------------------------------------------------

/// A workflow status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Status {
    /// Status id.
    pub id: String,
    /// Display name, matched against `--issue-status-name`.
    pub name: String,
}

/// One page of `GET rest/api/2/search`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub issues: Vec<IssueDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueDto {
    pub id: String,
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueFields {
    #[serde(default)]
    pub issuetype: Option<Named>,
    #[serde(default)]
    pub priority: Option<Named>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Named {
    #[serde(default)]
    pub name: Option<String>,
}

impl IssueDto {
    /// Maps the wire issue onto the domain [`Issue`].
    pub(crate) fn into_issue(self, resource: &str) -> Result<Issue, JiraError> {
        let decode = |message: String| JiraError::Decode {
            resource: resource.to_string(),
            message,
        };

        let id = IssueId::new(self.id).ok_or_else(|| decode("issue with empty id".into()))?;
        let key = IssueKey::new(self.key)
            .ok_or_else(|| decode(format!("issue {id} has an empty key")))?;
        let created = self.fields.created.as_deref().and_then(|raw| {
            let parsed = Timestamp::parse(raw);
            if parsed.is_none() {
                warn!(issue = %key, created = raw, "Ignoring unparseable created date");
            }
            parsed
        });
        let updated = self.fields.updated.as_deref().and_then(Timestamp::parse);

        Ok(Issue {
            id,
            key,
            issue_type: self
                .fields
                .issuetype
                .and_then(|t| t.name)
                .filter(|name| !name.trim().is_empty()),
            created,
            updated,
            priority: self
                .fields
                .priority
                .and_then(|p| p.name)
                .unwrap_or_default(),
            title: self.fields.summary.unwrap_or_default(),
            description: self.fields.description.unwrap_or_default(),
            last_commit: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Dev-status API: branches linked to an issue
// ---------------------------------------------------------------------------

/// `GET rest/dev-status/latest/issue/detail`.
#[derive(Debug, Deserialize)]
pub(crate) struct DevStatusDetail {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub detail: Vec<DevStatusInstance>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevStatusInstance {
    #[serde(default)]
    pub branches: Vec<BranchDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BranchDto {
    #[serde(default)]
    pub name: String,
    pub repository: RepositoryDto,
    #[serde(default)]
    pub last_commit: Option<LastCommit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryDto {
    #[serde(default)]
    pub name: String,
}

impl DevStatusDetail {
    /// Flattens the branches of every integration instance, in response
    /// order. Entries without a branch or repository name are skipped.
    pub(crate) fn into_branches(self) -> Vec<BranchDescriptor> {
        self.detail
            .into_iter()
            .flat_map(|instance| instance.branches)
            .filter_map(|branch| {
                let Some(name) = BranchName::new(branch.name) else {
                    warn!("Skipping dev-status branch without a name");
                    return None;
                };
                let Some(repository) = RepositoryName::new(branch.repository.name) else {
                    warn!(branch = %name, "Skipping dev-status branch without a repository");
                    return None;
                };
                Some(BranchDescriptor {
                    name,
                    repository: Repository { name: repository },
                    last_commit: branch.last_commit,
                })
            })
            .collect()
    }
}

fn default_true() -> bool {
    true
}
