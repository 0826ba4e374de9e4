//! Keyed before/after comparison status.
//!
//! Used by the matrix diff engine to label each emitted record relative to
//! the last-synced baseline, and by anything else that compares two
//! snapshots key by key.

use serde::{Deserialize, Serialize};

/// The status of a key when comparing a baseline against a working copy.
///
/// - `Added`     -- present only in the working copy.
/// - `Removed`   -- present only in the baseline.
/// - `Changed`   -- present in both with different values.
/// - `Unchanged` -- present in both with identical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl DiffStatus {
    /// Compare the presence and value of one key on both sides.
    ///
    /// Returns `None` when the key is absent from both.
    pub fn classify<T: PartialEq>(before: Option<&T>, after: Option<&T>) -> Option<Self> {
        match (before, after) {
            (None, None) => None,
            (None, Some(_)) => Some(Self::Added),
            (Some(_), None) => Some(Self::Removed),
            (Some(b), Some(a)) if b == a => Some(Self::Unchanged),
            (Some(_), Some(_)) => Some(Self::Changed),
        }
    }

    /// Whether this status represents an effective change.
    pub fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    /// String representation for display and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
