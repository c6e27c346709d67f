//! Run and per-group outcome reporting.

use crate::error::FailureKind;
use crate::routing::RejectedRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of invalid routing codes shown in summaries.
pub const REJECTED_SAMPLE_SIZE: usize = 5;

/// A non-fatal issue found while building one notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupWarning {
    /// The placeholder text did not occur in the template
    PlaceholderAbsent {
        /// The placeholder that was searched for
        placeholder: String,
    },
}

impl std::fmt::Display for GroupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupWarning::PlaceholderAbsent { placeholder } => {
                write!(f, "placeholder '{}' not found in template", placeholder)
            }
        }
    }
}

/// What happened to one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    /// The notice was written
    Written {
        /// Output file
        path: PathBuf,
        /// Non-fatal issues
        warnings: Vec<GroupWarning>,
    },
    /// The group was skipped
    Failed {
        /// Failure classification
        kind: FailureKind,
        /// Human-readable reason
        message: String,
    },
}

/// Result of processing one organization group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    /// Resolved organization name
    pub org_name: String,

    /// Routing code prefix shared by the group
    pub routing_prefix: String,

    /// Representative routing code
    pub routing_code: String,

    /// Number of records in the group
    pub record_count: usize,

    /// Outcome of the group
    pub outcome: GroupOutcome,
}

impl GroupReport {
    /// Check if the notice was written.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, GroupOutcome::Written { .. })
    }

    /// Output path, when written.
    pub fn path(&self) -> Option<&PathBuf> {
        match &self.outcome {
            GroupOutcome::Written { path, .. } => Some(path),
            GroupOutcome::Failed { .. } => None,
        }
    }
}

/// Summary of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Records excluded by validation, in input order
    pub rejected: Vec<RejectedRecord>,

    /// One entry per group, in group order
    pub groups: Vec<GroupReport>,
}

impl RunReport {
    /// Create an empty report starting now.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            rejected: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Number of notices written.
    pub fn success_count(&self) -> usize {
        self.groups.iter().filter(|g| g.is_success()).count()
    }

    /// Number of groups that failed.
    pub fn failure_count(&self) -> usize {
        self.groups.len() - self.success_count()
    }

    /// Check whether every group produced a notice.
    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// Total number of valid records across groups.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.record_count).sum()
    }

    /// Routing codes of the first rejected records.
    pub fn rejected_sample(&self) -> Vec<&str> {
        self.rejected
            .iter()
            .take(REJECTED_SAMPLE_SIZE)
            .map(|r| r.record.routing_code.as_str())
            .collect()
    }

    /// Summary line, e.g. `Generated 3/4 notices`.
    pub fn summary(&self) -> String {
        format!(
            "Generated {}/{} notices",
            self.success_count(),
            self.groups.len()
        )
    }

    /// Run duration in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
