//! Automated approval of Renovate merge requests on GitLab
//!
//! Renovate opens dependency-update merge requests; this crate walks a list
//! of repositories, picks out the open merge requests that match the
//! configured policy (author, labels, branch pattern, pipeline health) and
//! posts an approval note to each one.
//!
//! Module map:
//! - [`config`] - environment-driven policy and settings
//! - [`repolist`] - where the repository list comes from
//! - [`gitlab`] - the API port and its HTTP client
//! - [`reconcile`] - filter pipeline, per-repository reconciler, fan-out
//! - [`logging`] / [`error`] - the usual plumbing

pub mod config;
pub mod error;
pub mod gitlab;
pub mod logging;
pub mod reconcile;
pub mod repolist;
pub mod types;
