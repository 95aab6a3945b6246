//! Grouping issues by type and collapsing the groups into report buckets.
//!
//! Both operations are pure and total: an issue with no type is grouped under
//! [`OTHER_GROUP`] rather than rejected, and every group lands in exactly one
//! bucket.

use indexmap::IndexMap;

use crate::Issue;

/// Group used for issues whose type is missing or blank.
pub const OTHER_GROUP: &str = "Other";

/// Group name that is routed to [`Buckets::bugs`] (compared case-insensitively).
pub const BUG_GROUP: &str = "Bug";

/// Issues (or their projections) keyed by group name, in first-seen order.
pub type IssueGroups<T> = IndexMap<String, Vec<T>>;

/// Standard group key: the issue's type name.
pub fn issue_type(issue: &Issue) -> Option<&str> {
    issue.issue_type.as_deref()
}

/// Groups issues by `group_key`, projecting each through `project`.
///
/// Group order is the order in which each key is first seen; items within a
/// group keep their input order. A key of `None` or an empty string is
/// grouped under [`OTHER_GROUP`].
pub fn classify<'a, T, K, P>(issues: &'a [Issue], group_key: K, mut project: P) -> IssueGroups<T>
where
    K: Fn(&Issue) -> Option<&str>,
    P: FnMut(&'a Issue) -> T,
{
    let mut groups: IssueGroups<T> = IndexMap::new();
    for issue in issues {
        let key = match group_key(issue).map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => OTHER_GROUP,
        };
        let item = project(issue);
        match groups.get_mut(key) {
            Some(group) => group.push(item),
            None => {
                groups.insert(key.to_string(), vec![item]);
            }
        }
    }
    groups
}

/// Groups issues by `group_key` without projecting them.
pub fn group<K>(issues: &[Issue], group_key: K) -> IssueGroups<&Issue>
where
    K: Fn(&Issue) -> Option<&str>,
{
    classify(issues, group_key, |issue| issue)
}

/// The two release-note buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets<T> {
    /// Items from every group whose name is `Bug` (any case).
    pub bugs: Vec<T>,
    /// Items from every other group.
    pub tasks: Vec<T>,
}

impl<T> Buckets<T> {
    /// Total number of items across both buckets.
    pub fn len(&self) -> usize {
        self.bugs.len() + self.tasks.len()
    }

    /// Returns `true` if both buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty() && self.tasks.is_empty()
    }
}

impl<T> Default for Buckets<T> {
    fn default() -> Self {
        Self {
            bugs: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

/// Returns `true` if `group` names the bug bucket.
pub fn is_bug_group(group: &str) -> bool {
    group.trim().eq_ignore_ascii_case(BUG_GROUP)
}

/// Merges typed groups into [`Buckets`], preserving group order and the order
/// of items within each group.
pub fn bucketize<T>(groups: IssueGroups<T>) -> Buckets<T> {
    let mut buckets = Buckets::default();
    for (name, items) in groups {
        if is_bug_group(&name) {
            buckets.bugs.extend(items);
        } else {
            buckets.tasks.extend(items);
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::issue;

    #[test]
    fn groups_in_first_seen_order() {
        let issues = vec![
            issue("P-1", "Task"),
            issue("P-2", "Bug"),
            issue("P-3", "Task"),
            issue("P-4", "Story"),
        ];
        let groups = classify(&issues, issue_type, |i| i.key.to_string());

        let names: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(names, ["Task", "Bug", "Story"]);
        assert_eq!(groups["Task"], ["P-1", "P-3"]);
    }

    #[test]
    fn missing_types_fall_into_other() {
        let issues = vec![issue("P-1", ""), issue("P-2", "  ")];
        let groups = group(&issues, issue_type);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[OTHER_GROUP].len(), 2);
    }

    #[test]
    fn custom_key_functions_are_honoured() {
        let issues = vec![issue("P-1", "Bug"), issue("P-2", "Task")];
        let groups = group(&issues, |i| Some(i.priority.as_str()));
        assert_eq!(groups.keys().collect::<Vec<_>>(), ["Medium"]);
    }

    #[test]
    fn bucketize_splits_bug_and_everything_else() {
        let issues = vec![issue("A", "Bug"), issue("B", "Task"), issue("C", "Story")];
        let buckets = bucketize(classify(&issues, issue_type, |i| i.key.to_string()));

        assert_eq!(buckets.bugs, ["A"]);
        assert_eq!(buckets.tasks, ["B", "C"]);
        assert_eq!(buckets.len(), issues.len());
    }

    #[test]
    fn bug_group_match_ignores_case() {
        let issues = vec![issue("A", "bug"), issue("B", "BUG"), issue("C", "Bugfix")];
        let buckets = bucketize(group(&issues, issue_type));
        assert_eq!(buckets.bugs.len(), 2);
        assert_eq!(buckets.tasks.len(), 1);
    }

    #[test]
    fn every_issue_lands_in_exactly_one_bucket() {
        let types = ["Bug", "Task", "", "Story", "bug", "Epic", "Sub-task"];
        let issues: Vec<_> = types
            .iter()
            .enumerate()
            .map(|(n, t)| issue(&format!("K-{n}"), t))
            .collect();

        let buckets = bucketize(group(&issues, issue_type));
        assert_eq!(buckets.len(), issues.len());
        for issue in &issues {
            let hits = buckets
                .bugs
                .iter()
                .chain(&buckets.tasks)
                .filter(|i| i.id == issue.id)
                .count();
            assert_eq!(hits, 1, "{} placed {hits} times", issue.key);
        }
    }

    #[test]
    fn empty_input_gives_empty_buckets() {
        let buckets = bucketize(group(&[], issue_type));
        assert!(buckets.is_empty());
    }
}
