//! HTTP client for the agent control-plane API.
//!
//! Thin JSON-over-HTTP wrapper around the listing and command operations
//! the resolution pipeline needs. All methods are single request/response;
//! retries and pagination are left to the control plane's defaults.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use agentsync_shared::{
    AgentAliasId, AgentId, AgentSummary, AgentSyncError, AgentVersion, AliasSummary,
    DataSourceId, DataSourceSummary, KnowledgeBaseId, KnowledgeBaseSummary, Result,
    VersionSummary,
};

/// User-Agent string for control-plane requests.
const USER_AGENT: &str = concat!("agentsync/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 3;

// ---------------------------------------------------------------------------
// Wire envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AgentList {
    agents: Vec<AgentSummary>,
}

#[derive(Debug, Deserialize)]
struct VersionList {
    versions: Vec<VersionSummary>,
}

#[derive(Debug, Deserialize)]
struct KnowledgeBaseList {
    knowledge_bases: Vec<KnowledgeBaseSummary>,
}

#[derive(Debug, Deserialize)]
struct DataSourceList {
    data_sources: Vec<DataSourceSummary>,
}

#[derive(Debug, Deserialize)]
struct AliasList {
    aliases: Vec<AliasSummary>,
}

/// Acknowledgement returned when an ingestion job is accepted.
///
/// The job runs out-of-band; this is the only synchronous signal the
/// control plane gives us.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionJobAck {
    /// Identifier of the accepted job.
    pub job_id: String,
    /// Initial job status as reported at submission (e.g., `"STARTING"`).
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct InvokeOutput {
    completion: String,
}

// ---------------------------------------------------------------------------
// ControlPlaneClient
// ---------------------------------------------------------------------------

/// Client for the remote agent control plane.
#[derive(Debug, Clone)]
pub struct ControlPlaneClient {
    http: Client,
    endpoint: Url,
}

impl ControlPlaneClient {
    /// Build a client for the given endpoint.
    ///
    /// `api_token` is sent as a bearer token on every request; how it was
    /// obtained is the caller's concern.
    pub fn new(endpoint: &str, api_token: &str, timeout_secs: u64) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            AgentSyncError::validation(format!("invalid control-plane endpoint '{endpoint}': {e}"))
        })?;

        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_token}"))
            .map_err(|_| AgentSyncError::validation("API token contains invalid characters"))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AgentSyncError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, endpoint })
    }

    /// List agents whose name exactly matches `name`.
    pub async fn list_agents_by_name(&self, name: &str) -> Result<Vec<AgentSummary>> {
        let mut url = self.join("v1/agents")?;
        url.query_pairs_mut().append_pair("name", name);
        let list: AgentList = self.get_json(url).await?;
        Ok(list.agents)
    }

    /// List all agents known to the control plane.
    pub async fn list_agents(&self) -> Result<Vec<AgentSummary>> {
        let url = self.join("v1/agents")?;
        let list: AgentList = self.get_json(url).await?;
        Ok(list.agents)
    }

    /// List version summaries for an agent, in the control plane's default
    /// (newest-first) order.
    pub async fn list_agent_versions(&self, agent_id: &AgentId) -> Result<Vec<VersionSummary>> {
        let url = self.join(&format!("v1/agents/{agent_id}/versions"))?;
        let list: VersionList = self.get_json(url).await?;
        Ok(list.versions)
    }

    /// List knowledge bases associated with an agent version.
    pub async fn list_agent_knowledge_bases(
        &self,
        agent_id: &AgentId,
        version: &AgentVersion,
    ) -> Result<Vec<KnowledgeBaseSummary>> {
        let url = self.join(&format!(
            "v1/agents/{agent_id}/versions/{version}/knowledge-bases"
        ))?;
        let list: KnowledgeBaseList = self.get_json(url).await?;
        Ok(list.knowledge_bases)
    }

    /// List data sources under a knowledge base.
    pub async fn list_data_sources(
        &self,
        kb_id: &KnowledgeBaseId,
    ) -> Result<Vec<DataSourceSummary>> {
        let url = self.join(&format!("v1/knowledge-bases/{kb_id}/data-sources"))?;
        let list: DataSourceList = self.get_json(url).await?;
        Ok(list.data_sources)
    }

    /// Trigger an asynchronous ingestion job for one data source.
    ///
    /// Fire-and-forget: a success only means the control plane accepted
    /// the submission, not that the job will complete.
    pub async fn start_ingestion_job(
        &self,
        kb_id: &KnowledgeBaseId,
        data_source_id: &DataSourceId,
    ) -> Result<IngestionJobAck> {
        let url = self.join(&format!(
            "v1/knowledge-bases/{kb_id}/data-sources/{data_source_id}/ingestion-jobs"
        ))?;
        debug!(%kb_id, %data_source_id, "starting ingestion job");

        let response = self
            .http
            .post(url.clone())
            .send()
            .await
            .map_err(|e| AgentSyncError::Network(format!("{url}: {e}")))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| AgentSyncError::Network(format!("{url}: failed to parse body: {e}")))
    }

    /// List routable aliases for an agent.
    pub async fn list_agent_aliases(&self, agent_id: &AgentId) -> Result<Vec<AliasSummary>> {
        let url = self.join(&format!("v1/agents/{agent_id}/aliases"))?;
        let list: AliasList = self.get_json(url).await?;
        Ok(list.aliases)
    }

    /// Invoke an agent through one of its aliases and return the completion.
    pub async fn invoke_agent(
        &self,
        agent_id: &AgentId,
        alias_id: &AgentAliasId,
        input: &str,
    ) -> Result<String> {
        let url = self.join(&format!("v1/agents/{agent_id}/aliases/{alias_id}/invoke"))?;

        let response = self
            .http
            .post(url.clone())
            .json(&serde_json::json!({ "input": input }))
            .send()
            .await
            .map_err(|e| AgentSyncError::Network(format!("{url}: {e}")))?;

        let response = check_status(response).await?;
        let output: InvokeOutput = response
            .json()
            .await
            .map_err(|e| AgentSyncError::Network(format!("{url}: failed to parse body: {e}")))?;
        Ok(output.completion)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn join(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| AgentSyncError::validation(format!("invalid request path '{path}': {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "control-plane GET");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AgentSyncError::Network(format!("{url}: {e}")))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| AgentSyncError::Network(format!("{url}: failed to parse body: {e}")))
    }
}

/// Map a non-success response to an `Api` error carrying the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<unreadable body>"));
    Err(AgentSyncError::Api {
        status: status.as_u16(),
        message,
    })
}
