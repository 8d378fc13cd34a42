//! Staged resolvers: name → agent id → latest version → knowledge base.
//!
//! Each stage is one remote listing call. An empty listing is fatal to the
//! whole pipeline and is reported against the input the user gave us, not
//! an internal code. A listing with more than one entry is truncated to
//! its first entry with a warning; the control plane is expected to hold
//! a 1:1 relationship at each stage.

use tracing::{debug, warn};

use agentsync_client::ControlPlaneClient;
use agentsync_shared::{
    AgentAliasId, AgentId, AgentSyncError, AgentVersion, KnowledgeBaseId, Result,
};

/// Resolve a human-readable agent name to its control-plane identifier.
///
/// Matching is exact and case-sensitive against the control plane's name
/// field.
pub async fn resolve_agent(client: &ControlPlaneClient, name: &str) -> Result<AgentId> {
    let agents = client.list_agents_by_name(name).await?;

    if agents.len() > 1 {
        warn!(name, matches = agents.len(), "multiple agents match name, using first");
    }

    let agent = agents
        .into_iter()
        .next()
        .ok_or_else(|| AgentSyncError::not_found("agent", name))?;

    debug!(name, agent_id = %agent.id, "agent resolved");
    Ok(agent.id)
}

/// Resolve the latest version of an agent.
///
/// The control plane lists versions newest first; we take the first entry
/// and do no recency computation of our own.
pub async fn resolve_latest_version(
    client: &ControlPlaneClient,
    agent_id: &AgentId,
) -> Result<AgentVersion> {
    let versions = client.list_agent_versions(agent_id).await?;

    let latest = versions
        .into_iter()
        .next()
        .ok_or_else(|| AgentSyncError::not_found("agent version", agent_id.as_str()))?;

    debug!(%agent_id, version = %latest.version, "latest version resolved");
    Ok(latest.version)
}

/// Resolve the knowledge base associated with an agent version.
///
/// The association listing is assumed to hold exactly one entry; extra
/// entries are truncated to the first.
pub async fn resolve_knowledge_base(
    client: &ControlPlaneClient,
    agent_id: &AgentId,
    version: &AgentVersion,
) -> Result<KnowledgeBaseId> {
    let kbs = client.list_agent_knowledge_bases(agent_id, version).await?;

    if kbs.len() > 1 {
        warn!(
            %agent_id,
            %version,
            associations = kbs.len(),
            "multiple knowledge bases associated, using first"
        );
    }

    let kb = kbs
        .into_iter()
        .next()
        .ok_or_else(|| AgentSyncError::not_found("knowledge base", agent_id.as_str()))?;

    debug!(%agent_id, %version, kb_id = %kb.id, "knowledge base resolved");
    Ok(kb.id)
}

/// Resolve the first routable alias of an agent.
pub async fn resolve_alias(
    client: &ControlPlaneClient,
    agent_id: &AgentId,
) -> Result<AgentAliasId> {
    let aliases = client.list_agent_aliases(agent_id).await?;

    if aliases.len() > 1 {
        warn!(%agent_id, aliases = aliases.len(), "multiple aliases, using first");
    }

    let alias = aliases
        .into_iter()
        .next()
        .ok_or_else(|| AgentSyncError::not_found("agent alias", agent_id.as_str()))?;

    debug!(%agent_id, alias_id = %alias.id, "alias resolved");
    Ok(alias.id)
}
