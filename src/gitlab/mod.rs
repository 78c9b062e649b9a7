//! GitLab API port
//!
//! Provides the narrow interface the reconciliation engine needs from GitLab.

mod client;

pub use client::GitLabClient;

use crate::error::Result;
use crate::types::{MergeRequestSummary, PipelineDetail, PipelineSummary};
use async_trait::async_trait;

/// Query parameters for listing merge requests
///
/// Author and label filtering happen server-side through this query, so only
/// merge requests matching them are ever fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRequestQuery {
    /// MR state to list (e.g. `opened`)
    pub state: Option<String>,
    /// Restrict to MRs created by this username
    pub author_username: Option<String>,
    /// Restrict to MRs carrying all of these labels
    pub labels: Option<Vec<String>>,
}

/// GitLab API operations consumed by the reconciliation engine
///
/// This trait abstracts the remote service, allowing the same reconciliation
/// logic to run against the real API or a test double. Implementations are
/// stateless request/response adapters and safe to share across workers.
#[async_trait]
pub trait GitLabApi: Send + Sync {
    /// List merge requests for a repository, filtered by `query`
    async fn list_merge_requests(
        &self,
        repo: &str,
        query: &MergeRequestQuery,
    ) -> Result<Vec<MergeRequestSummary>>;

    /// List pipelines for a repository, filtered by ref
    ///
    /// The returned order is the API's own ordering; callers treat the first
    /// entry as the latest pipeline.
    async fn list_pipelines(&self, repo: &str, ref_name: &str) -> Result<Vec<PipelineSummary>>;

    /// Fetch the detailed state of one pipeline
    async fn get_pipeline(&self, repo: &str, pipeline_id: u64) -> Result<PipelineDetail>;

    /// Post a note (comment) on a merge request
    async fn create_mr_note(&self, repo: &str, mr_iid: u64, body: &str) -> Result<()>;
}
