//! The branch lookup port.
//!
//! The aggregation engine never talks to the tracker itself. Infrastructure
//! crates implement [`BranchLookup`] and the caller injects the implementation;
//! tests inject in-memory fakes.

use async_trait::async_trait;

use crate::{BranchDescriptor, IssueId, LookupError, RepositoryName};

/// Restricts branch lookups to a single repository.
///
/// Matching compares slug-normalised names, so `"My Repo"`, `"my-repo"` and
/// `"MY_REPO"` all select the same repository. An empty filter matches every
/// repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoFilter {
    slug: Option<String>,
}

impl RepoFilter {
    /// A filter that matches every repository.
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates a filter from a user-supplied repository name. Blank input
    /// yields [`RepoFilter::all`].
    pub fn new(repository: impl AsRef<str>) -> Self {
        let slug = slug::slugify(repository.as_ref().trim());
        if slug.is_empty() {
            Self::all()
        } else {
            Self { slug: Some(slug) }
        }
    }

    /// Returns `true` if this filter accepts every repository.
    pub fn is_all(&self) -> bool {
        self.slug.is_none()
    }

    /// Returns the normalised repository slug, if filtering.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Returns `true` if `repository` passes the filter.
    pub fn matches(&self, repository: &RepositoryName) -> bool {
        match &self.slug {
            None => true,
            Some(wanted) => slug::slugify(repository.as_str()) == *wanted,
        }
    }

    /// Keeps only the descriptors whose repository passes the filter,
    /// preserving their order.
    pub fn retain(&self, branches: Vec<BranchDescriptor>) -> Vec<BranchDescriptor> {
        if self.is_all() {
            return branches;
        }
        branches
            .into_iter()
            .filter(|branch| self.matches(&branch.repository.name))
            .collect()
    }
}

impl std::fmt::Display for RepoFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.slug {
            Some(slug) => write!(f, "{slug}"),
            None => write!(f, "*"),
        }
    }
}

/// Resolves the branches linked to one issue.
///
/// ## Contract
///
/// - When `filter` is not [`RepoFilter::all`], every returned descriptor's
///   repository must satisfy [`RepoFilter::matches`].
/// - Transport and authentication failures must be reported as `Err`, never
///   as an empty list.
/// - Implementations apply their own timeouts; the engine has no way to
///   cancel a lookup once started.
#[async_trait]
pub trait BranchLookup: Send + Sync {
    /// Returns the branches linked to `issue_id`, in the tracker's order.
    async fn branches(
        &self,
        issue_id: &IssueId,
        filter: &RepoFilter,
    ) -> Result<Vec<BranchDescriptor>, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BranchName;

    fn repo(name: &str) -> RepositoryName {
        RepositoryName::new(name).unwrap()
    }

    #[test]
    fn blank_filter_matches_everything() {
        let filter = RepoFilter::new("   ");
        assert!(filter.is_all());
        assert!(filter.matches(&repo("anything")));
    }

    #[test]
    fn filter_compares_slugs_case_insensitively() {
        let filter = RepoFilter::new("Web Frontend");
        assert_eq!(filter.slug(), Some("web-frontend"));
        assert!(filter.matches(&repo("web-frontend")));
        assert!(filter.matches(&repo("WEB FRONTEND")));
        assert!(!filter.matches(&repo("web-backend")));
    }

    #[test]
    fn retain_keeps_matching_descriptors_in_order() {
        let branch = |name: &str, repository: &str| {
            BranchDescriptor::new(BranchName::new(name).unwrap(), repo(repository))
        };
        let filter = RepoFilter::new("api");
        let kept = filter.retain(vec![
            branch("feature/a", "API"),
            branch("feature/b", "web"),
            branch("feature/c", "api"),
        ]);
        let names: Vec<_> = kept.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["feature/a", "feature/c"]);
    }
}
