//! Core release-notes domain for relnotes.
//!
//! This crate turns a list of tracked issues into two independent outputs: a
//! bucketed (bugs vs tasks) plain-text report, and the list of branch names
//! linked to those issues. Branches are discovered through the
//! [`BranchLookup`] port; infrastructure crates implement it, this crate never
//! performs network, file, or environment access.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** It defines *what* is needed;
//! infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype domain identifiers (`IssueId`, `BranchName`, etc.) |
//! | [`types`] | Shared value types (`Issue`, `BranchDescriptor`, `ConcurrencyLimit`, etc.) |
//! | [`errors`] | Aggregation, lookup and retry-policy types |
//! | [`lookup`] | The [`BranchLookup`] port and [`RepoFilter`] |
//! | [`sort`] | Commit-time ordering |
//! | [`aggregate`] | Bounded-concurrency branch aggregation |
//! | [`classify`] | Grouping by type and bug/task bucketing |
//! | [`report`] | Plain-text rendering |
//! | [`notes`] | The [`ReleaseNotes`] facade |

pub mod aggregate;
pub mod classify;
pub mod errors;
pub mod identifiers;
pub mod lookup;
pub mod notes;
pub mod report;
pub mod sort;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use classify::{Buckets, IssueGroups};
pub use errors::{LookupError, ReleaseError, RetryPolicy};
pub use identifiers::{BoardId, BranchName, IssueId, IssueKey, ProjectKey, RepositoryName, RunId};
pub use lookup::{BranchLookup, RepoFilter};
pub use notes::ReleaseNotes;
pub use types::{
    AuthorTimestamp, BranchDescriptor, ConcurrencyLimit, Issue, LastCommit, Repository, Timestamp,
};
