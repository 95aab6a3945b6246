//! Plain-text rendering of release notes.

use crate::{BranchName, Buckets, IssueKey};

/// Side padding used by [`render_title`] when the caller has no preference.
pub const DEFAULT_TITLE_PADDING: usize = 3;

/// Browse URL of an issue on the tracker host (e.g. `acme.atlassian.net`).
pub fn issue_link(host: &str, key: &IssueKey) -> String {
    format!("https://{}/browse/{key}", host.trim_end_matches('/'))
}

/// Renders a title banner: a blank row, the padded title, and a blank row,
/// all the same width.
pub fn render_title(text: &str, side_padding: usize) -> String {
    let width = text.chars().count() + side_padding * 2;
    let blank = " ".repeat(width);
    let pad = " ".repeat(side_padding);
    format!("\n{blank}\n{pad}{text}{pad}\n{blank}\n")
}

/// Renders the bucket report, tasks first, one item per line.
pub fn render_buckets<T: std::fmt::Display>(buckets: &Buckets<T>) -> String {
    let mut out = String::new();
    for (name, items) in [("Tasks", &buckets.tasks), ("Bugs", &buckets.bugs)] {
        out.push_str(&format!("\n{name}:\n\n"));
        for item in items {
            out.push_str(&format!("{item}\n"));
        }
        out.push('\n');
    }
    out
}

/// Renders one `git merge origin/<branch>` line per branch.
pub fn render_branch_list(branches: &[BranchName]) -> String {
    let mut out = branches
        .iter()
        .map(|branch| format!("git merge origin/{branch}"))
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}
