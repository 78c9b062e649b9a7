//! Pipeline health evaluation
//!
//! Decides, for one branch, whether its latest pipeline counts as healthy
//! under the active policy. All failures collapse to `false`; callers never
//! see an error from this module.

use crate::config::Policy;
use crate::gitlab::GitLabApi;
use crate::types::{PipelineDetail, PipelineStatus};
use tracing::{debug, error, warn};

/// Check whether the latest pipeline for `branch` succeeded per policy.
///
/// "Latest" is the first entry of the pipeline listing. The listing's own
/// order is trusted as-is; no recency sort is applied on top of it.
pub async fn branch_pipeline_healthy(
    policy: &Policy,
    api: &dyn GitLabApi,
    repo: &str,
    branch: &str,
) -> bool {
    debug!(
        repository = repo,
        branch, "checking pipeline status for branch"
    );

    let pipelines = match api.list_pipelines(repo, branch).await {
        Ok(pipelines) => pipelines,
        Err(e) => {
            error!(
                repository = repo,
                branch,
                error = %e,
                "failed to list pipelines for branch"
            );
            return false;
        }
    };

    let Some(latest) = pipelines.first() else {
        warn!(repository = repo, branch, "no pipelines found for branch");
        return false;
    };

    let detail = match api.get_pipeline(repo, latest.id).await {
        Ok(detail) => detail,
        Err(e) => {
            error!(
                repository = repo,
                pipeline_id = latest.id,
                error = %e,
                "failed to get pipeline detail"
            );
            return false;
        }
    };

    detail_is_healthy(policy, repo, &detail)
}

/// Apply the status and icon checks to a fetched pipeline detail.
fn detail_is_healthy(policy: &Policy, repo: &str, detail: &PipelineDetail) -> bool {
    if detail.status != PipelineStatus::Success {
        warn!(
            repository = repo,
            pipeline_id = detail.id,
            pipeline_status = %detail.status,
            pipeline_icon = %detail.icon,
            "pipeline did not succeed"
        );
        return false;
    }

    if policy.filter_by_pipeline_without_warnings && !detail.has_clean_icon() {
        warn!(
            repository = repo,
            pipeline_id = detail.id,
            pipeline_icon = %detail.icon,
            "pipeline succeeded with warnings"
        );
        return false;
    }

    debug!(
        repository = repo,
        pipeline_id = detail.id,
        "pipeline succeeded"
    );
    true
}
