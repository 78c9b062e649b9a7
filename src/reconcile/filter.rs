//! Per-merge-request qualification
//!
//! The branch check runs first because it is local and free; the pipeline
//! check costs two API calls and only runs for branches that matched.

use super::pipeline::branch_pipeline_healthy;
use crate::config::Policy;
use crate::gitlab::GitLabApi;
use crate::types::MergeRequestSummary;
use tracing::debug;

/// Decide whether one merge request qualifies for the approval action.
///
/// Author and label filtering are not re-checked here; they are pushed into
/// the listing query so non-matching merge requests are never fetched.
pub async fn qualifies(
    policy: &Policy,
    api: &dyn GitLabApi,
    repo: &str,
    mr: &MergeRequestSummary,
) -> bool {
    debug!(
        repository = repo,
        mr_iid = mr.iid,
        branch = %mr.source_branch,
        title = %mr.title,
        "checking merge request"
    );

    if policy.filter_by_branch {
        if !branch_allowed(policy, &mr.source_branch) {
            debug!(
                repository = repo,
                mr_iid = mr.iid,
                branch = %mr.source_branch,
                "branch does not match allowed pattern"
            );
            return false;
        }

        debug!(
            repository = repo,
            mr_iid = mr.iid,
            branch = %mr.source_branch,
            "branch matches allowed pattern"
        );
    }

    if policy.filter_by_succeeded_pipeline {
        if !branch_pipeline_healthy(policy, api, repo, &mr.source_branch).await {
            debug!(
                repository = repo,
                mr_iid = mr.iid,
                branch = %mr.source_branch,
                "pipeline not healthy for merge request"
            );
            return false;
        }

        debug!(
            repository = repo,
            mr_iid = mr.iid,
            branch = %mr.source_branch,
            "pipeline healthy for merge request"
        );
    }

    true
}

/// Whether the source branch fully matches the allowed pattern.
fn branch_allowed(policy: &Policy, branch: &str) -> bool {
    policy.branch_pattern.is_match(branch)
}
