//! Fan-out over repositories
//!
//! A fixed pool of workers drains a queue pre-loaded with every repository
//! name. The pool size is a static tuning constant, deliberately not derived
//! from the repository count. The call returns only after every worker has
//! finished; there is no per-repository timeout and no cancellation.

use super::project::reconcile_project;
use crate::config::Policy;
use crate::gitlab::GitLabApi;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Number of concurrent repository workers.
pub const WORKER_COUNT: usize = 5;

/// Reconcile every repository, at most [`WORKER_COUNT`] at a time.
///
/// Repositories are handed out in list order, but completion order across
/// repositories is unspecified. Per-repository failures are absorbed inside
/// [`reconcile_project`], so a bad repository never aborts the run.
pub async fn reconcile_all(policy: &Policy, repositories: Vec<String>, api: Arc<dyn GitLabApi>) {
    let queue: Arc<Mutex<VecDeque<String>>> =
        Arc::new(Mutex::new(repositories.into_iter().collect()));

    let mut workers = JoinSet::new();
    for worker in 0..WORKER_COUNT {
        let queue = Arc::clone(&queue);
        let api = Arc::clone(&api);
        let policy = policy.clone();

        workers.spawn(async move {
            loop {
                // Lock only for the pop; the guard must not be held across
                // the reconcile await.
                let next = queue.lock().await.pop_front();
                let Some(repo) = next else { break };

                debug!(worker, repository = %repo, "reconciling repository");
                reconcile_project(&policy, api.as_ref(), &repo).await;
            }
        });
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "repository worker failed");
        }
    }
}
