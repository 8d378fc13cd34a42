//! End-to-end workflows: `sync_agent` (name → id → version → knowledge
//! base → ingestion fan-out) and `invoke_agent` (name → alias → invoke).
//!
//! Stages 1–3 are fail-fast: the first empty resolution aborts the run.
//! Stage 4 is isolate-and-continue: trigger failures stay in the report.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use agentsync_client::ControlPlaneClient;
use agentsync_shared::{
    AgentAliasId, AgentId, AgentSyncError, AgentVersion, KnowledgeBaseId, Result,
};

use crate::dispatch::{self, DispatchOptions, DispatchReport};
use crate::resolver;

// ---------------------------------------------------------------------------
// Sync config & report
// ---------------------------------------------------------------------------

/// Configuration for the `sync_agent` pipeline.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Human-readable agent name to resolve.
    pub agent_name: String,
    /// Fan-out options for the trigger stage.
    pub dispatch: DispatchOptions,
}

/// Result of a completed sync run.
#[derive(Debug)]
pub struct SyncReport {
    /// The name the run was asked to resolve.
    pub agent_name: String,
    /// Resolved agent identifier.
    pub agent_id: AgentId,
    /// Resolved (latest) agent version.
    pub version: AgentVersion,
    /// Resolved knowledge base.
    pub knowledge_base: KnowledgeBaseId,
    /// Per-data-source trigger outcomes.
    pub dispatch: DispatchReport,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new stage.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, report: &SyncReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _report: &SyncReport) {}
}

// ---------------------------------------------------------------------------
// Sync pipeline
// ---------------------------------------------------------------------------

/// Run the full sync pipeline for one agent name.
///
/// 1. Resolve the name to an agent id
/// 2. Resolve the latest version
/// 3. Resolve the associated knowledge base
/// 4. Trigger one ingestion job per data source
#[instrument(skip_all, fields(agent_name = %config.agent_name))]
pub async fn sync_agent(
    client: &ControlPlaneClient,
    config: &SyncConfig,
    progress: &dyn ProgressReporter,
) -> Result<SyncReport> {
    let start = Instant::now();
    let name = config.agent_name.as_str();

    // Reject blank input before any remote call.
    if name.trim().is_empty() {
        return Err(AgentSyncError::validation("agent name must not be empty"));
    }

    info!(name, "starting sync");

    progress.phase("Resolving agent");
    let agent_id = resolver::resolve_agent(client, name).await?;

    progress.phase("Resolving latest version");
    let version = resolver::resolve_latest_version(client, &agent_id).await?;

    progress.phase("Resolving knowledge base");
    let knowledge_base = resolver::resolve_knowledge_base(client, &agent_id, &version).await?;

    progress.phase("Triggering ingestion jobs");
    let dispatch = dispatch::dispatch_all(client, &knowledge_base, &config.dispatch).await?;

    let report = SyncReport {
        agent_name: name.to_string(),
        agent_id,
        version,
        knowledge_base,
        dispatch,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        agent_id = %report.agent_id,
        version = %report.version,
        kb_id = %report.knowledge_base,
        accepted = report.dispatch.accepted(),
        failed = report.dispatch.failed(),
        elapsed_ms = report.elapsed.as_millis(),
        "sync complete"
    );

    Ok(report)
}

// ---------------------------------------------------------------------------
// Invoke workflow
// ---------------------------------------------------------------------------

/// Result of invoking an agent through its first routable alias.
#[derive(Debug)]
pub struct InvokeReport {
    /// Resolved agent identifier.
    pub agent_id: AgentId,
    /// Alias the invocation was routed through.
    pub alias_id: AgentAliasId,
    /// Completion text returned by the agent runtime.
    pub completion: String,
}

/// Resolve an agent by name and invoke it with the given input.
#[instrument(skip_all, fields(agent_name = %agent_name))]
pub async fn invoke_agent(
    client: &ControlPlaneClient,
    agent_name: &str,
    input: &str,
) -> Result<InvokeReport> {
    if agent_name.trim().is_empty() {
        return Err(AgentSyncError::validation("agent name must not be empty"));
    }
    if input.trim().is_empty() {
        return Err(AgentSyncError::validation("input must not be empty"));
    }

    let agent_id = resolver::resolve_agent(client, agent_name).await?;
    let alias_id = resolver::resolve_alias(client, &agent_id).await?;
    let completion = client.invoke_agent(&agent_id, &alias_id, input).await?;

    info!(%agent_id, %alias_id, "invocation complete");

    Ok(InvokeReport {
        agent_id,
        alias_id,
        completion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ControlPlaneClient {
        ControlPlaneClient::new(&server.uri(), "test-token", 5).expect("build client")
    }

    fn sync_config(name: &str) -> SyncConfig {
        SyncConfig {
            agent_name: name.into(),
            dispatch: DispatchOptions::default(),
        }
    }

    /// Mount the full resolution chain for DateTimeAgent → A1B2 → 3 → KB9.
    async fn mount_resolution_chain(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/agents"))
            .and(query_param("name", "DateTimeAgent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "agents": [{"id": "A1B2", "name": "DateTimeAgent"}]
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/agents/A1B2/versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "versions": [{"version": "3"}, {"version": "2"}]
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/agents/A1B2/versions/3/knowledge-bases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "knowledge_bases": [{"id": "KB9"}]
            })))
            .mount(server)
            .await;
    }

    fn job_accepted(job_id: &str) -> ResponseTemplate {
        ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "job_id": job_id, "status": "STARTING"
        }))
    }

    #[tokio::test]
    async fn sync_happy_path_triggers_every_data_source() {
        let server = MockServer::start().await;
        mount_resolution_chain(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/knowledge-bases/KB9/data-sources"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data_sources": [{"id": "DS1"}, {"id": "DS2"}]
            })))
            .mount(&server)
            .await;

        for ds in ["DS1", "DS2"] {
            Mock::given(method("POST"))
                .and(path(format!(
                    "/v1/knowledge-bases/KB9/data-sources/{ds}/ingestion-jobs"
                )))
                .respond_with(job_accepted(&format!("J-{ds}")))
                .expect(1)
                .mount(&server)
                .await;
        }

        let report = sync_agent(
            &client_for(&server),
            &sync_config("DateTimeAgent"),
            &SilentProgress,
        )
        .await
        .unwrap();

        assert_eq!(report.agent_id.as_str(), "A1B2");
        assert_eq!(report.version.as_str(), "3");
        assert_eq!(report.knowledge_base.as_str(), "KB9");
        assert_eq!(report.dispatch.entries.len(), 2);
        assert_eq!(report.dispatch.accepted(), 2);
    }

    #[tokio::test]
    async fn unknown_name_halts_at_stage_one() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/agents"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"agents": []})),
            )
            .mount(&server)
            .await;

        // No later-stage call may be attempted after the name fails to resolve.
        Mock::given(method("GET"))
            .and(path("/v1/agents/A1B2/versions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = sync_agent(
            &client_for(&server),
            &sync_config("NoSuchAgent"),
            &SilentProgress,
        )
        .await
        .unwrap_err();

        match err {
            AgentSyncError::NotFound { stage, input } => {
                assert_eq!(stage, "agent");
                assert_eq!(input, "NoSuchAgent");
            }
            other => panic!("expected NotFound, got: {other}"),
        }
    }

    #[tokio::test]
    async fn zero_data_sources_is_a_successful_sync() {
        let server = MockServer::start().await;
        mount_resolution_chain(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/knowledge-bases/KB9/data-sources"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data_sources": []})),
            )
            .mount(&server)
            .await;

        let report = sync_agent(
            &client_for(&server),
            &sync_config("DateTimeAgent"),
            &SilentProgress,
        )
        .await
        .unwrap();

        assert!(report.dispatch.entries.is_empty());
    }

    #[tokio::test]
    async fn partial_trigger_failure_is_not_fatal() {
        let server = MockServer::start().await;
        mount_resolution_chain(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/knowledge-bases/KB9/data-sources"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data_sources": [{"id": "DS1"}, {"id": "DS2"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/knowledge-bases/KB9/data-sources/DS1/ingestion-jobs"))
            .respond_with(job_accepted("J-1"))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/knowledge-bases/KB9/data-sources/DS2/ingestion-jobs"))
            .respond_with(ResponseTemplate::new(429).set_body_string("too many jobs"))
            .mount(&server)
            .await;

        let report = sync_agent(
            &client_for(&server),
            &sync_config("DateTimeAgent"),
            &SilentProgress,
        )
        .await
        .unwrap();

        assert_eq!(report.dispatch.accepted(), 1);
        assert_eq!(report.dispatch.failed(), 1);
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_any_remote_call() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/agents"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = sync_agent(&client_for(&server), &sync_config("   "), &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, AgentSyncError::Validation { .. }));
    }

    #[tokio::test]
    async fn invoke_resolves_alias_and_returns_completion() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/agents"))
            .and(query_param("name", "DateTimeAgent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "agents": [{"id": "A1B2", "name": "DateTimeAgent"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/agents/A1B2/aliases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "aliases": [{"id": "AL1", "name": "prod"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/agents/A1B2/aliases/AL1/invoke"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "completion": "It is Friday."
            })))
            .mount(&server)
            .await;

        let report = invoke_agent(&client_for(&server), "DateTimeAgent", "What day is it?")
            .await
            .unwrap();

        assert_eq!(report.agent_id.as_str(), "A1B2");
        assert_eq!(report.alias_id.as_str(), "AL1");
        assert_eq!(report.completion, "It is Friday.");
    }
}
