//! Single-repository reconciliation
//!
//! Fetches open merge requests, runs each through the qualification filter,
//! then posts the configured note to the ones that passed. Every failure is
//! logged and absorbed here; nothing propagates to the scheduler.

use super::filter::qualifies;
use crate::config::Policy;
use crate::gitlab::{GitLabApi, MergeRequestQuery};
use tracing::{debug, error, info};

const STATE_OPEN: &str = "opened";

/// Reconcile all open merge requests of one repository.
pub async fn reconcile_project(policy: &Policy, api: &dyn GitLabApi, repo: &str) {
    let iids = qualifying_merge_requests(policy, api, repo).await;

    for iid in iids {
        approve(policy, api, repo, iid).await;
    }
}

/// List open merge requests and return the qualifying identifiers, in the
/// order the listing returned them.
async fn qualifying_merge_requests(policy: &Policy, api: &dyn GitLabApi, repo: &str) -> Vec<u64> {
    debug!(repository = repo, "listing merge requests");

    let query = list_query(policy);
    let mrs = match api.list_merge_requests(repo, &query).await {
        Ok(mrs) => mrs,
        Err(e) => {
            error!(repository = repo, error = %e, "failed to list merge requests");
            return Vec::new();
        }
    };

    let mut iids = Vec::new();
    for mr in &mrs {
        if qualifies(policy, api, repo, mr).await {
            iids.push(mr.iid);
        }
    }

    iids
}

/// Author and label filters become server-side query parameters.
fn list_query(policy: &Policy) -> MergeRequestQuery {
    let mut query = MergeRequestQuery {
        state: Some(STATE_OPEN.to_string()),
        ..MergeRequestQuery::default()
    };

    if policy.filter_by_author {
        query.author_username = Some(policy.author_username.clone());
    }
    if policy.filter_by_labels {
        query.labels = Some(policy.labels.clone());
    }

    query
}

/// Post the configured note to one merge request.
async fn approve(policy: &Policy, api: &dyn GitLabApi, repo: &str, iid: u64) {
    let body = policy.note_body();

    if policy.dry_run {
        info!(
            repository = repo,
            mr_iid = iid,
            note = body,
            "dry run, would approve merge request"
        );
        return;
    }

    match api.create_mr_note(repo, iid, body).await {
        Ok(()) => info!(repository = repo, mr_iid = iid, "approved merge request"),
        Err(e) => error!(
            repository = repo,
            mr_iid = iid,
            error = %e,
            "failed to create merge request note"
        ),
    }
}
