//! Shared value types for the release-notes domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (e.g. a concurrency limit is never zero)
//! and participate in domain computations.

use std::num::NonZeroUsize;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{BranchName, IssueId, IssueKey, RepositoryName};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A tracker timestamp normalised to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a [`Timestamp`] from milliseconds since the Unix epoch.
    ///
    /// Returns `None` if the value is outside chrono's representable range.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Parses a tracker timestamp.
    ///
    /// Accepts RFC 3339 (`2021-11-05T10:57:23Z`), the Jira flavour with a
    /// colon-less offset (`2021-11-05T03:57:23.000-0700`), and a naive
    /// date-time which is taken to be UTC.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    /// Returns milliseconds since the Unix epoch.
    pub fn epoch_millis(self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Commit metadata
// ---------------------------------------------------------------------------

/// Author timestamp of a commit exactly as the tracker reported it.
///
/// Dev-status payloads carry either epoch milliseconds or a formatted date
/// string, and occasionally garbage. The raw value is kept so that ordering
/// can fall back to the epoch instead of failing the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorTimestamp {
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// A formatted date-time string.
    Text(String),
}

impl AuthorTimestamp {
    /// Returns the timestamp as epoch milliseconds, or `None` if it cannot be
    /// interpreted.
    pub fn epoch_millis(&self) -> Option<i64> {
        match self {
            Self::EpochMillis(ms) => Some(*ms),
            Self::Text(text) => match text.trim().parse::<i64>() {
                Ok(ms) => Some(ms),
                Err(_) => Timestamp::parse(text).map(Timestamp::epoch_millis),
            },
        }
    }
}

/// The most recent commit known for an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastCommit {
    /// When the commit was authored. `None` when the tracker omitted it.
    #[serde(default)]
    pub author_timestamp: Option<AuthorTimestamp>,
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// A tracked work item, reduced to the fields release notes care about.
///
/// Issues are immutable once received; every stage of the engine derives new
/// collections rather than mutating its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Tracker-internal id; the branch lookup is keyed on this.
    pub id: IssueId,

    /// Human-facing key (e.g. `"PROJ-123"`).
    pub key: IssueKey,

    /// Issue type name (e.g. `"Bug"`, `"Task"`, `"Story"`).
    ///
    /// `None` when the tracker did not report one; such issues are grouped
    /// under [`crate::classify::OTHER_GROUP`].
    pub issue_type: Option<String>,

    /// When the issue was created. `None` when the tracker sent a date it
    /// could not parse; nothing downstream depends on it.
    pub created: Option<Timestamp>,

    /// When the issue was last updated, if ever.
    pub updated: Option<Timestamp>,

    /// Priority name (empty when unknown).
    pub priority: String,

    /// Issue summary line.
    pub title: String,

    /// Free-form description (empty when absent).
    pub description: String,

    /// Most recent commit linked to the issue, when known.
    pub last_commit: Option<LastCommit>,
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// The repository a branch lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository display name.
    pub name: RepositoryName,
}

/// A branch linked to an issue, as returned by a [`crate::BranchLookup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchDescriptor {
    /// Branch name.
    pub name: BranchName,

    /// Repository the branch belongs to.
    pub repository: Repository,

    /// Head commit of the branch, when the tracker reported one.
    ///
    /// Informational only: ordering uses [`Issue::last_commit`], never the
    /// commits of individual branches.
    pub last_commit: Option<LastCommit>,
}

impl BranchDescriptor {
    /// Creates a descriptor without commit metadata.
    pub fn new(name: BranchName, repository: RepositoryName) -> Self {
        Self {
            name,
            repository: Repository { name: repository },
            last_commit: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// Maximum number of branch lookups allowed in flight at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConcurrencyLimit(NonZeroUsize);

impl ConcurrencyLimit {
    /// The limit used when the caller does not configure one.
    pub const DEFAULT: usize = 5;

    /// Creates a [`ConcurrencyLimit`], returning `None` for zero.
    #[must_use]
    pub fn new(limit: usize) -> Option<Self> {
        NonZeroUsize::new(limit).map(Self)
    }

    /// Returns the limit as a `usize` (always at least 1).
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for ConcurrencyLimit {
    fn default() -> Self {
        // DEFAULT is a non-zero constant.
        Self(NonZeroUsize::new(Self::DEFAULT).unwrap_or(NonZeroUsize::MIN))
    }
}

impl std::fmt::Display for ConcurrencyLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
