//! Shared types, error model, and configuration for agentsync.
//!
//! This crate is the foundation depended on by all other agentsync crates.
//! It provides:
//! - [`AgentSyncError`] — the unified error type
//! - Domain types ([`AgentId`], [`AgentVersion`], [`KnowledgeBaseId`], listing summaries)
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ControlPlaneConfig, DispatchConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, resolve_api_token,
};
pub use error::{AgentSyncError, Result};
pub use types::{
    AgentAliasId, AgentId, AgentSummary, AgentVersion, AliasSummary, DataSourceId,
    DataSourceSummary, KnowledgeBaseId, KnowledgeBaseSummary, VersionSummary,
};
