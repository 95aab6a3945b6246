//! The release-notes facade consumed by the CLI.
//!
//! [`ReleaseNotes`] bundles the injected [`BranchLookup`] with the settings
//! the caller resolved (tracker host, concurrency limit) and exposes the two
//! outputs of a run. The outputs are independent: a failed branch aggregation
//! never affects the bucket report.

use std::sync::Arc;

use crate::aggregate::fetch_branches;
use crate::classify::{bucketize, classify, issue_type};
use crate::report::{issue_link, render_buckets};
use crate::sort::sort_by_last_commit;
use crate::{BranchLookup, BranchName, Buckets, ConcurrencyLimit, Issue, ReleaseError, RepoFilter};

/// Builds release notes for one set of issues.
pub struct ReleaseNotes<L: ?Sized> {
    lookup: Arc<L>,
    host: String,
    limit: ConcurrencyLimit,
}

impl<L> ReleaseNotes<L>
where
    L: BranchLookup + ?Sized + 'static,
{
    /// Creates a facade rendering issue links against `host` and using the
    /// default concurrency limit.
    pub fn new(lookup: Arc<L>, host: impl Into<String>) -> Self {
        Self {
            lookup,
            host: host.into(),
            limit: ConcurrencyLimit::default(),
        }
    }

    /// Overrides the number of branch lookups allowed in flight at once.
    #[must_use]
    pub fn with_concurrency_limit(mut self, limit: ConcurrencyLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the configured concurrency limit.
    pub fn concurrency_limit(&self) -> ConcurrencyLimit {
        self.limit
    }

    /// Classifies issues into bug and task buckets, each item rendered as the
    /// issue's browse link.
    pub fn buckets(&self, issues: &[Issue]) -> Buckets<String> {
        bucketize(classify(issues, issue_type, |issue| {
            issue_link(&self.host, &issue.key)
        }))
    }

    /// Renders the bucket report as plain text.
    pub fn report(&self, issues: &[Issue]) -> String {
        render_buckets(&self.buckets(issues))
    }

    /// Orders issues most-recent-commit first and collects the names of their
    /// branches in `filter`'s repository.
    ///
    /// # Errors
    ///
    /// See [`fetch_branches`].
    pub async fn aggregate(
        &self,
        issues: &[Issue],
        filter: &RepoFilter,
    ) -> Result<Vec<BranchName>, ReleaseError> {
        let ordered = sort_by_last_commit(issues);
        fetch_branches(ordered, filter, Arc::clone(&self.lookup), self.limit).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::test_support::issue;
    use crate::{BranchDescriptor, IssueId, LookupError, RepositoryName};

    /// Serves fixed branch lists and applies the repository filter the way a
    /// real tracker adapter must.
    #[derive(Default)]
    struct StaticLookup {
        branches: HashMap<String, Vec<BranchDescriptor>>,
        calls: Mutex<Vec<String>>,
    }

    impl StaticLookup {
        fn with(mut self, key: &str, branches: &[(&str, &str)]) -> Self {
            let branches = branches
                .iter()
                .map(|(name, repo)| {
                    BranchDescriptor::new(
                        BranchName::new(*name).unwrap(),
                        RepositoryName::new(*repo).unwrap(),
                    )
                })
                .collect();
            self.branches.insert(format!("id-{key}"), branches);
            self
        }
    }

    #[async_trait]
    impl BranchLookup for StaticLookup {
        async fn branches(
            &self,
            issue_id: &IssueId,
            filter: &RepoFilter,
        ) -> Result<Vec<BranchDescriptor>, LookupError> {
            self.calls.lock().unwrap().push(issue_id.to_string());
            let found = self.branches.get(issue_id.as_str()).cloned().unwrap_or_default();
            Ok(filter.retain(found))
        }
    }

    #[test]
    fn report_lists_issue_links_by_bucket() {
        let issues = vec![issue("P-1", "Bug"), issue("P-2", "Story")];
        let notes = ReleaseNotes::new(Arc::new(StaticLookup::default()), "acme.atlassian.net");

        let report = notes.report(&issues);

        assert_eq!(
            report,
            "\nTasks:\n\nhttps://acme.atlassian.net/browse/P-2\n\n\
             \nBugs:\n\nhttps://acme.atlassian.net/browse/P-1\n\n"
        );
    }

    #[tokio::test]
    async fn aggregate_dispatches_most_recent_commit_first() {
        let issues = vec![
            issue("A", "Task").with_commit_millis(100),
            issue("B", "Task").with_commit_millis(200),
            issue("C", "Task"),
        ];
        let lookup = Arc::new(
            StaticLookup::default()
                .with("A", &[("feature/a", "app")])
                .with("B", &[("feature/b", "app")]),
        );
        let notes = ReleaseNotes::new(Arc::clone(&lookup), "acme.atlassian.net")
            .with_concurrency_limit(ConcurrencyLimit::new(1).unwrap());

        let names = notes.aggregate(&issues, &RepoFilter::all()).await.unwrap();

        assert_eq!(*lookup.calls.lock().unwrap(), ["id-B", "id-A", "id-C"]);
        let names: Vec<_> = names.iter().map(BranchName::as_str).collect();
        assert_eq!(names, ["feature/b", "feature/a"]);
    }

    #[tokio::test]
    async fn aggregate_only_returns_branches_from_the_filtered_repository() {
        let issues = vec![issue("A", "Task"), issue("B", "Bug")];
        let lookup = Arc::new(
            StaticLookup::default()
                .with("A", &[("feature/a", "Web App"), ("feature/a-api", "api")])
                .with("B", &[("bugfix/b", "web-app")]),
        );
        let notes = ReleaseNotes::new(lookup, "acme.atlassian.net");

        let mut names: Vec<String> = notes
            .aggregate(&issues, &RepoFilter::new("WEB APP"))
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        names.sort();

        assert_eq!(names, ["bugfix/b", "feature/a"]);
    }

    #[test]
    fn default_concurrency_limit_is_five() {
        let notes = ReleaseNotes::new(Arc::new(StaticLookup::default()), "host");
        assert_eq!(notes.concurrency_limit().get(), 5);
    }
}
