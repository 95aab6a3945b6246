//! Issue builders shared by unit tests.

use crate::{AuthorTimestamp, Issue, IssueId, IssueKey, LastCommit, Timestamp};

/// Builds an issue with the given key and type. An empty type yields an issue
/// with no type at all. The id is `id-{key}`.
pub(crate) fn issue(key: &str, issue_type: &str) -> Issue {
    Issue {
        id: IssueId::new(format!("id-{key}")).unwrap(),
        key: IssueKey::new(key).unwrap(),
        issue_type: (!issue_type.is_empty()).then(|| issue_type.to_string()),
        created: Timestamp::from_epoch_millis(0),
        updated: None,
        priority: "Medium".to_string(),
        title: format!("Title of {key}"),
        description: String::new(),
        last_commit: None,
    }
}

impl Issue {
    pub(crate) fn with_commit_millis(mut self, millis: i64) -> Self {
        self.last_commit = Some(LastCommit {
            author_timestamp: Some(AuthorTimestamp::EpochMillis(millis)),
        });
        self
    }

    pub(crate) fn with_commit_text(mut self, text: &str) -> Self {
        self.last_commit = Some(LastCommit {
            author_timestamp: Some(AuthorTimestamp::Text(text.to_string())),
        });
        self
    }
}
