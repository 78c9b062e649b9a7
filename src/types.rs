//! Core types for mr-shipit
//!
//! Read-only snapshots of remote state, fetched once per reconciliation pass
//! and never mutated locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An open merge request as returned by the listing call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeRequestSummary {
    /// MR iid (unique within its repository)
    pub iid: u64,
    /// MR title (for logging only)
    pub title: String,
    /// Source branch name
    pub source_branch: String,
    /// Author username (absent for some system-created MRs)
    pub author: Option<String>,
    /// Labels attached to the MR
    pub labels: Vec<String>,
    /// When the MR was created (for logging only)
    pub created_at: Option<DateTime<Utc>>,
}

/// A pipeline entry from the per-ref pipeline listing
///
/// Multiple pipelines may exist for one branch; only the first-listed one is
/// consulted. The API's own list order defines "latest"; `updated_at` is
/// carried for logging, never for ordering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Pipeline id
    pub id: u64,
    /// The ref this pipeline ran for
    pub ref_name: String,
    /// Last update timestamp (for logging only)
    pub updated_at: Option<DateTime<Utc>>,
}

/// Coarse pipeline status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    /// Pipeline finished successfully
    Success,
    /// Pipeline finished with a failure
    Failed,
    /// Any other state (running, pending, canceled, skipped, …)
    Other,
}

impl PipelineStatus {
    /// Map a GitLab status string onto the coarse status
    pub fn from_api(status: &str) -> Self {
        match status {
            "success" => Self::Success,
            "failed" => Self::Failed,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Icon value the detailed status carries for a clean success
pub const SUCCESS_ICON: &str = "status_success";

/// Detailed state of a single pipeline
///
/// The detailed-status icon distinguishes a clean success (`status_success`)
/// from a success with warnings (e.g. `status_warning` from allowed-to-fail
/// jobs).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineDetail {
    /// Pipeline id
    pub id: u64,
    /// Coarse status
    pub status: PipelineStatus,
    /// Detailed-status icon name
    pub icon: String,
}

impl PipelineDetail {
    /// Whether the detailed-status icon is the clean-success icon
    pub fn has_clean_icon(&self) -> bool {
        self.icon == SUCCESS_ICON
    }
}
