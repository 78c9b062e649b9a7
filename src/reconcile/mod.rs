//! Reconciliation core
//!
//! Layered from leaf to root:
//! 1. Pipeline - is the latest pipeline for a branch healthy?
//! 2. Filter - does one merge request qualify for approval?
//! 3. Project - qualify and approve everything in one repository
//! 4. Scheduler - fan the repository list out over a fixed worker pool

mod filter;
mod pipeline;
mod project;
mod scheduler;

pub use filter::qualifies;
pub use pipeline::branch_pipeline_healthy;
pub use project::reconcile_project;
pub use scheduler::{WORKER_COUNT, reconcile_all};
