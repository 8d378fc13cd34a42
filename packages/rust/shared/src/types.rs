//! Core domain types for the agentsync resolution pipeline.
//!
//! Identifiers are opaque handles issued by the control plane; agentsync
//! never generates them locally. Newtypes keep the stages from mixing
//! them up (an agent id is not a knowledge base id).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifier newtypes
// ---------------------------------------------------------------------------

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// View the raw identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

id_newtype! {
    /// Opaque agent identifier issued by the control plane.
    AgentId
}

id_newtype! {
    /// Version token of an agent (e.g., `"3"` or `"DRAFT"`).
    AgentVersion
}

id_newtype! {
    /// Identifier of a knowledge base associated with an agent version.
    KnowledgeBaseId
}

id_newtype! {
    /// Identifier of a data source under a knowledge base.
    DataSourceId
}

id_newtype! {
    /// Identifier of a routable agent alias.
    AgentAliasId
}

// ---------------------------------------------------------------------------
// Listing summaries
// ---------------------------------------------------------------------------

/// One entry from an agent listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    /// Control-plane identifier.
    pub id: AgentId,
    /// Human-readable name; name resolution matches this exactly.
    pub name: String,
    /// Optional operator-facing description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry from a version listing. The control plane lists newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSummary {
    /// The version token.
    pub version: AgentVersion,
}

/// One entry from a knowledge base association listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseSummary {
    /// Knowledge base identifier.
    pub id: KnowledgeBaseId,
    /// Optional operator-facing description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry from a data source listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceSummary {
    /// Data source identifier.
    pub id: DataSourceId,
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One entry from an agent alias listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasSummary {
    /// Alias identifier.
    pub id: AgentAliasId,
    /// Optional alias name (e.g., `"prod"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_newtypes_are_transparent() {
        let id: AgentId = serde_json::from_str("\"A1B2\"").expect("parse AgentId");
        assert_eq!(id.as_str(), "A1B2");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"A1B2\"");
    }

    #[test]
    fn agent_summary_roundtrip() {
        let summary = AgentSummary {
            id: "A1B2".into(),
            name: "DateTimeAgent".into(),
            description: None,
        };
        let json = serde_json::to_string(&summary).expect("serialize");
        // Optional fields are omitted, not null.
        assert!(!json.contains("description"));
        let parsed: AgentSummary = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.name, "DateTimeAgent");
        assert_eq!(parsed.id, AgentId::from("A1B2"));
    }

    #[test]
    fn data_source_summary_tolerates_missing_name() {
        let parsed: DataSourceSummary =
            serde_json::from_str(r#"{"id":"DS1"}"#).expect("deserialize");
        assert_eq!(parsed.id.as_str(), "DS1");
        assert!(parsed.name.is_none());
    }
}
