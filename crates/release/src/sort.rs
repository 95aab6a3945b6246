//! Commit-time ordering of issues.
//!
//! Branch lookups are dispatched most-recently-committed first. Issues without
//! a usable last-commit timestamp sort as if committed at the Unix epoch.

use crate::Issue;

/// Sort key used for issues with no parseable last-commit timestamp.
pub const UNKNOWN_COMMIT_TIME: i64 = 0;

/// Returns the epoch-millisecond sort key of an issue's last commit, or
/// [`UNKNOWN_COMMIT_TIME`] when the issue has no commit or the timestamp
/// cannot be interpreted.
pub fn commit_sort_key(issue: &Issue) -> i64 {
    issue
        .last_commit
        .as_ref()
        .and_then(|commit| commit.author_timestamp.as_ref())
        .and_then(|ts| ts.epoch_millis())
        .unwrap_or(UNKNOWN_COMMIT_TIME)
}

/// Orders issues most-recent-commit first.
///
/// Stable-sorts ascending by [`commit_sort_key`] and then reverses, so issues
/// sharing a key (including every issue without a timestamp) come out in the
/// reverse of their input order.
pub fn sort_by_last_commit(issues: &[Issue]) -> Vec<&Issue> {
    let mut ordered: Vec<&Issue> = issues.iter().collect();
    ordered.sort_by_cached_key(|issue| commit_sort_key(issue));
    ordered.reverse();
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::issue;

    fn keys(issues: &[&Issue]) -> Vec<String> {
        issues.iter().map(|i| i.key.to_string()).collect()
    }

    #[test]
    fn most_recent_commit_comes_first() {
        let issues = vec![
            issue("A", "Task").with_commit_millis(100),
            issue("B", "Task").with_commit_millis(200),
            issue("C", "Task"),
        ];
        assert_eq!(keys(&sort_by_last_commit(&issues)), ["B", "A", "C"]);
    }

    #[test]
    fn issues_without_timestamps_go_last_in_reverse_input_order() {
        let issues = vec![
            issue("X", "Task"),
            issue("Y", "Bug").with_commit_text("not a date"),
            issue("Z", "Task").with_commit_millis(5),
            issue("W", "Task"),
        ];
        assert_eq!(keys(&sort_by_last_commit(&issues)), ["Z", "W", "Y", "X"]);
    }

    #[test]
    fn formatted_timestamps_are_compared_chronologically() {
        let issues = vec![
            issue("OLD", "Task").with_commit_text("2021-11-04T06:09:09.106-0700"),
            issue("NEW", "Task").with_commit_text("2021-11-05T03:57:23.000-0700"),
        ];
        assert_eq!(keys(&sort_by_last_commit(&issues)), ["NEW", "OLD"]);
    }

    #[test]
    fn sort_key_defaults_to_epoch() {
        assert_eq!(commit_sort_key(&issue("A", "Task")), UNKNOWN_COMMIT_TIME);
        assert_eq!(
            commit_sort_key(&issue("A", "Task").with_commit_text("garbage")),
            UNKNOWN_COMMIT_TIME
        );
    }

    #[test]
    fn empty_input_sorts_to_empty_output() {
        assert!(sort_by_last_commit(&[]).is_empty());
    }
}
