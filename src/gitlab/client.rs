//! GitLab REST v4 client
//!
//! Production adapter for the [`GitLabApi`] port, using reqwest.

use crate::error::{Error, Result};
use crate::gitlab::{GitLabApi, MergeRequestQuery};
use crate::types::{MergeRequestSummary, PipelineDetail, PipelineStatus, PipelineSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitLab API client using reqwest
///
/// Shared read-only across workers; holds no mutable state beyond reqwest's
/// internal connection pool.
pub struct GitLabClient {
    client: Client,
    token: String,
    base_url: String,
}

#[derive(Deserialize)]
struct MrAuthor {
    username: String,
}

#[derive(Deserialize)]
struct MergeRequest {
    iid: u64,
    title: String,
    source_branch: String,
    author: Option<MrAuthor>,
    #[serde(default)]
    labels: Vec<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<MergeRequest> for MergeRequestSummary {
    fn from(mr: MergeRequest) -> Self {
        Self {
            iid: mr.iid,
            title: mr.title,
            source_branch: mr.source_branch,
            author: mr.author.map(|a| a.username),
            labels: mr.labels,
            created_at: mr.created_at,
        }
    }
}

#[derive(Deserialize)]
struct PipelineInfo {
    id: u64,
    #[serde(rename = "ref")]
    ref_name: String,
    updated_at: Option<DateTime<Utc>>,
}

impl From<PipelineInfo> for PipelineSummary {
    fn from(info: PipelineInfo) -> Self {
        Self {
            id: info.id,
            ref_name: info.ref_name,
            updated_at: info.updated_at,
        }
    }
}

#[derive(Deserialize)]
struct DetailedStatus {
    #[serde(default)]
    icon: String,
}

#[derive(Deserialize)]
struct Pipeline {
    id: u64,
    status: String, // "success", "failed", "running", "pending", …
    #[serde(default)]
    detailed_status: Option<DetailedStatus>,
}

impl From<Pipeline> for PipelineDetail {
    fn from(pipeline: Pipeline) -> Self {
        Self {
            id: pipeline.id,
            status: PipelineStatus::from_api(&pipeline.status),
            icon: pipeline.detailed_status.map(|d| d.icon).unwrap_or_default(),
        }
    }
}

impl GitLabClient {
    /// Create a new GitLab client
    ///
    /// Fails when the token is empty or the base URL does not parse; both are
    /// configuration errors surfaced before any reconciliation starts.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::Config("GITLAB_API_TOKEN must be set".to_string()));
        }

        Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid GitLab URL {base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        debug!(base_url, "GitLab client initialized");
        Ok(Self {
            client,
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{path}", self.base_url)
    }

    fn encoded_project(repo: &str) -> String {
        urlencoding::encode(repo).into_owned()
    }
}

#[async_trait]
impl GitLabApi for GitLabClient {
    async fn list_merge_requests(
        &self,
        repo: &str,
        query: &MergeRequestQuery,
    ) -> Result<Vec<MergeRequestSummary>> {
        debug!(repository = repo, "fetching merge requests");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests",
            Self::encoded_project(repo)
        ));

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(ref state) = query.state {
            params.push(("state", state.clone()));
        }
        if let Some(ref author) = query.author_username {
            params.push(("author_username", author.clone()));
        }
        if let Some(ref labels) = query.labels {
            params.push(("labels", labels.join(",")));
        }

        let mrs: Vec<MergeRequest> = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&params)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(repository = repo, count = mrs.len(), "fetched merge requests");
        Ok(mrs.into_iter().map(Into::into).collect())
    }

    async fn list_pipelines(&self, repo: &str, ref_name: &str) -> Result<Vec<PipelineSummary>> {
        debug!(repository = repo, branch = ref_name, "fetching pipelines");
        let url = self.api_url(&format!(
            "/projects/{}/pipelines",
            Self::encoded_project(repo)
        ));

        let pipelines: Vec<PipelineInfo> = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("ref", ref_name)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(
            repository = repo,
            branch = ref_name,
            count = pipelines.len(),
            "fetched pipelines"
        );
        Ok(pipelines.into_iter().map(Into::into).collect())
    }

    async fn get_pipeline(&self, repo: &str, pipeline_id: u64) -> Result<PipelineDetail> {
        debug!(repository = repo, pipeline_id, "fetching pipeline detail");
        let url = self.api_url(&format!(
            "/projects/{}/pipelines/{pipeline_id}",
            Self::encoded_project(repo)
        ));

        let pipeline: Pipeline = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(repository = repo, pipeline_id, "fetched pipeline detail");
        Ok(pipeline.into())
    }

    async fn create_mr_note(&self, repo: &str, mr_iid: u64, body: &str) -> Result<()> {
        debug!(repository = repo, mr_iid, "creating MR note");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{mr_iid}/notes",
            Self::encoded_project(repo)
        ));

        self.client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;

        debug!(repository = repo, mr_iid, "created MR note");
        Ok(())
    }
}
