//! Mock GitLab API for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use mr_shipit::error::{Error, Result};
use mr_shipit::gitlab::{GitLabApi, MergeRequestQuery};
use mr_shipit::types::{
    MergeRequestSummary, PipelineDetail, PipelineStatus, PipelineSummary, SUCCESS_ICON,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `list_merge_requests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMergeRequestsCall {
    pub repo: String,
    pub query: MergeRequestQuery,
}

/// Call record for `list_pipelines`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPipelinesCall {
    pub repo: String,
    pub ref_name: String,
}

/// Call record for `get_pipeline`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPipelineCall {
    pub repo: String,
    pub pipeline_id: u64,
}

/// Call record for `create_mr_note`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCall {
    pub repo: String,
    pub mr_iid: u64,
    pub body: String,
}

/// Simple mock GitLab API for testing
///
/// Features:
/// - Configurable responses per repository / branch / pipeline
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockGitLab {
    // Response maps
    merge_requests: Mutex<HashMap<String, Vec<MergeRequestSummary>>>,
    pipelines: Mutex<HashMap<(String, String), Vec<PipelineSummary>>>,
    pipeline_details: Mutex<HashMap<(String, u64), PipelineDetail>>,
    // Call tracking
    list_mr_calls: Mutex<Vec<ListMergeRequestsCall>>,
    list_pipeline_calls: Mutex<Vec<ListPipelinesCall>>,
    get_pipeline_calls: Mutex<Vec<GetPipelineCall>>,
    note_calls: Mutex<Vec<NoteCall>>,
    // Error injection
    error_on_list_mrs: Mutex<HashMap<String, String>>,
    error_on_list_pipelines: Mutex<Option<String>>,
    error_on_get_pipeline: Mutex<Option<String>>,
    error_on_create_note: Mutex<Option<String>>,
}

impl MockGitLab {
    /// Create an empty mock: every repository lists zero merge requests and
    /// zero pipelines until responses are configured.
    pub fn new() -> Self {
        Self {
            merge_requests: Mutex::new(HashMap::new()),
            pipelines: Mutex::new(HashMap::new()),
            pipeline_details: Mutex::new(HashMap::new()),
            list_mr_calls: Mutex::new(Vec::new()),
            list_pipeline_calls: Mutex::new(Vec::new()),
            get_pipeline_calls: Mutex::new(Vec::new()),
            note_calls: Mutex::new(Vec::new()),
            error_on_list_mrs: Mutex::new(HashMap::new()),
            error_on_list_pipelines: Mutex::new(None),
            error_on_get_pipeline: Mutex::new(None),
            error_on_create_note: Mutex::new(None),
        }
    }

    // === Response configuration ===

    /// Add a merge request to a repository's listing
    pub fn add_merge_request(&self, repo: &str, mr: MergeRequestSummary) {
        self.merge_requests
            .lock()
            .unwrap()
            .entry(repo.to_string())
            .or_default()
            .push(mr);
    }

    /// Set the pipeline listing for a (repo, ref) pair
    pub fn set_pipelines(&self, repo: &str, ref_name: &str, pipelines: Vec<PipelineSummary>) {
        self.pipelines
            .lock()
            .unwrap()
            .insert((repo.to_string(), ref_name.to_string()), pipelines);
    }

    /// Set the detail response for one pipeline
    pub fn set_pipeline_detail(&self, repo: &str, pipeline_id: u64, detail: PipelineDetail) {
        self.pipeline_details
            .lock()
            .unwrap()
            .insert((repo.to_string(), pipeline_id), detail);
    }

    /// Helper to set up a branch whose latest pipeline is a clean success
    pub fn setup_healthy_branch(&self, repo: &str, branch: &str, pipeline_id: u64) {
        self.set_pipelines(
            repo,
            branch,
            vec![PipelineSummary {
                id: pipeline_id,
                ref_name: branch.to_string(),
                updated_at: None,
            }],
        );
        self.set_pipeline_detail(
            repo,
            pipeline_id,
            PipelineDetail {
                id: pipeline_id,
                status: PipelineStatus::Success,
                icon: SUCCESS_ICON.to_string(),
            },
        );
    }

    /// Helper to set up a branch whose latest pipeline succeeded with warnings
    pub fn setup_warning_branch(&self, repo: &str, branch: &str, pipeline_id: u64) {
        self.set_pipelines(
            repo,
            branch,
            vec![PipelineSummary {
                id: pipeline_id,
                ref_name: branch.to_string(),
                updated_at: None,
            }],
        );
        self.set_pipeline_detail(
            repo,
            pipeline_id,
            PipelineDetail {
                id: pipeline_id,
                status: PipelineStatus::Success,
                icon: "status_warning".to_string(),
            },
        );
    }

    /// Helper to set up a branch whose latest pipeline failed
    pub fn setup_failed_branch(&self, repo: &str, branch: &str, pipeline_id: u64) {
        self.set_pipelines(
            repo,
            branch,
            vec![PipelineSummary {
                id: pipeline_id,
                ref_name: branch.to_string(),
                updated_at: None,
            }],
        );
        self.set_pipeline_detail(
            repo,
            pipeline_id,
            PipelineDetail {
                id: pipeline_id,
                status: PipelineStatus::Failed,
                icon: "status_failed".to_string(),
            },
        );
    }

    // === Error injection ===

    /// Make `list_merge_requests` fail for one repository
    pub fn fail_list_merge_requests(&self, repo: &str, msg: &str) {
        self.error_on_list_mrs
            .lock()
            .unwrap()
            .insert(repo.to_string(), msg.to_string());
    }

    /// Make every `list_pipelines` call fail
    pub fn fail_list_pipelines(&self, msg: &str) {
        *self.error_on_list_pipelines.lock().unwrap() = Some(msg.to_string());
    }

    /// Make every `get_pipeline` call fail
    pub fn fail_get_pipeline(&self, msg: &str) {
        *self.error_on_get_pipeline.lock().unwrap() = Some(msg.to_string());
    }

    /// Make every `create_mr_note` call fail
    pub fn fail_create_note(&self, msg: &str) {
        *self.error_on_create_note.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification ===

    /// Get all `list_merge_requests` calls
    pub fn get_list_mr_calls(&self) -> Vec<ListMergeRequestsCall> {
        self.list_mr_calls.lock().unwrap().clone()
    }

    /// Get all `list_pipelines` calls
    pub fn get_list_pipeline_calls(&self) -> Vec<ListPipelinesCall> {
        self.list_pipeline_calls.lock().unwrap().clone()
    }

    /// Get all `get_pipeline` calls
    pub fn get_get_pipeline_calls(&self) -> Vec<GetPipelineCall> {
        self.get_pipeline_calls.lock().unwrap().clone()
    }

    /// Get all `create_mr_note` calls
    pub fn get_note_calls(&self) -> Vec<NoteCall> {
        self.note_calls.lock().unwrap().clone()
    }

    /// Count of notes posted, across all repositories
    pub fn note_count(&self) -> usize {
        self.note_calls.lock().unwrap().len()
    }

    /// Count of pipeline-related calls (listing plus detail fetches)
    pub fn pipeline_call_count(&self) -> usize {
        self.list_pipeline_calls.lock().unwrap().len()
            + self.get_pipeline_calls.lock().unwrap().len()
    }

    /// Assert that a note with this exact body was posted to the MR
    pub fn assert_note_posted(&self, repo: &str, mr_iid: u64, body: &str) {
        let calls = self.get_note_calls();
        assert!(
            calls
                .iter()
                .any(|c| c.repo == repo && c.mr_iid == mr_iid && c.body == body),
            "Expected note ({repo}, !{mr_iid}, {body:?}) but got: {calls:?}"
        );
    }

    /// Assert that no note was posted to the MR
    pub fn assert_note_not_posted(&self, repo: &str, mr_iid: u64) {
        let calls = self.get_note_calls();
        assert!(
            !calls.iter().any(|c| c.repo == repo && c.mr_iid == mr_iid),
            "Expected no note for ({repo}, !{mr_iid}) but got: {calls:?}"
        );
    }
}

impl Default for MockGitLab {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitLabApi for MockGitLab {
    async fn list_merge_requests(
        &self,
        repo: &str,
        query: &MergeRequestQuery,
    ) -> Result<Vec<MergeRequestSummary>> {
        self.list_mr_calls
            .lock()
            .unwrap()
            .push(ListMergeRequestsCall {
                repo: repo.to_string(),
                query: query.clone(),
            });

        // Check for injected error
        if let Some(msg) = self.error_on_list_mrs.lock().unwrap().get(repo) {
            return Err(Error::GitLabApi(msg.clone()));
        }

        let responses = self.merge_requests.lock().unwrap();
        Ok(responses.get(repo).cloned().unwrap_or_default())
    }

    async fn list_pipelines(&self, repo: &str, ref_name: &str) -> Result<Vec<PipelineSummary>> {
        self.list_pipeline_calls
            .lock()
            .unwrap()
            .push(ListPipelinesCall {
                repo: repo.to_string(),
                ref_name: ref_name.to_string(),
            });

        if let Some(msg) = self.error_on_list_pipelines.lock().unwrap().as_ref() {
            return Err(Error::GitLabApi(msg.clone()));
        }

        let responses = self.pipelines.lock().unwrap();
        Ok(responses
            .get(&(repo.to_string(), ref_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_pipeline(&self, repo: &str, pipeline_id: u64) -> Result<PipelineDetail> {
        self.get_pipeline_calls.lock().unwrap().push(GetPipelineCall {
            repo: repo.to_string(),
            pipeline_id,
        });

        if let Some(msg) = self.error_on_get_pipeline.lock().unwrap().as_ref() {
            return Err(Error::GitLabApi(msg.clone()));
        }

        let responses = self.pipeline_details.lock().unwrap();
        responses
            .get(&(repo.to_string(), pipeline_id))
            .cloned()
            .ok_or_else(|| {
                Error::GitLabApi(format!(
                    "get_pipeline: no response configured for pipeline {pipeline_id}"
                ))
            })
    }

    async fn create_mr_note(&self, repo: &str, mr_iid: u64, body: &str) -> Result<()> {
        self.note_calls.lock().unwrap().push(NoteCall {
            repo: repo.to_string(),
            mr_iid,
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_create_note.lock().unwrap().as_ref() {
            return Err(Error::GitLabApi(msg.clone()));
        }

        Ok(())
    }
}
