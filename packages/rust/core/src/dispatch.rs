//! Ingestion job fan-out over a knowledge base's data sources.
//!
//! Every data source gets exactly one trigger attempt per dispatch, with
//! bounded concurrency. Trigger failures are isolated: they land in the
//! report for that data source and never abort the siblings. The report
//! lists entries in enumeration order regardless of completion order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use agentsync_client::ControlPlaneClient;
use agentsync_shared::{DataSourceId, KnowledgeBaseId, Result};

// ---------------------------------------------------------------------------
// Dispatch report
// ---------------------------------------------------------------------------

/// Outcome of a single trigger attempt.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// The control plane accepted the submission.
    Accepted {
        /// Identifier of the accepted ingestion job.
        job_id: String,
    },
    /// The submission was rejected or errored.
    Failed {
        /// Human-readable failure description.
        message: String,
    },
}

impl DispatchOutcome {
    /// Whether this trigger attempt was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Per-data-source result of a dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchEntry {
    /// The data source this entry describes.
    pub data_source: DataSourceId,
    /// Human-readable data source name, if the control plane provided one.
    pub name: Option<String>,
    /// What happened to the trigger attempt.
    pub outcome: DispatchOutcome,
}

/// Aggregate result of triggering ingestion across all data sources.
///
/// An empty report is a legitimate terminal state: a knowledge base may
/// have zero data sources.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// The knowledge base the jobs were triggered against.
    pub knowledge_base: KnowledgeBaseId,
    /// One entry per data source, in enumeration order.
    pub entries: Vec<DispatchEntry>,
}

impl DispatchReport {
    /// Number of accepted trigger attempts.
    pub fn accepted(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_accepted()).count()
    }

    /// Number of failed trigger attempts.
    pub fn failed(&self) -> usize {
        self.entries.len() - self.accepted()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Options controlling the trigger fan-out.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Maximum concurrent trigger requests.
    pub concurrency: u32,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Enumerate the knowledge base's data sources and trigger one ingestion
/// job per source.
///
/// The enumeration failing is an error; an individual trigger failing is
/// not. Triggers are fire-and-forget: acceptance is recorded, completion
/// is never polled.
#[instrument(skip_all, fields(kb_id = %kb_id))]
pub async fn dispatch_all(
    client: &ControlPlaneClient,
    kb_id: &KnowledgeBaseId,
    options: &DispatchOptions,
) -> Result<DispatchReport> {
    let data_sources = client.list_data_sources(kb_id).await?;

    if data_sources.is_empty() {
        info!(%kb_id, "knowledge base has no data sources, nothing to trigger");
        return Ok(DispatchReport {
            knowledge_base: kb_id.clone(),
            entries: Vec::new(),
        });
    }

    info!(
        %kb_id,
        data_sources = data_sources.len(),
        concurrency = options.concurrency,
        "triggering ingestion jobs"
    );

    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1) as usize));
    let mut handles = Vec::with_capacity(data_sources.len());

    for source in data_sources {
        let client = client.clone();
        let kb = kb_id.clone();
        let sem = semaphore.clone();

        handles.push(tokio::spawn(async move {
            let _permit = sem.acquire().await.expect("semaphore closed");

            let outcome = match client.start_ingestion_job(&kb, &source.id).await {
                Ok(ack) => DispatchOutcome::Accepted { job_id: ack.job_id },
                Err(e) => {
                    warn!(data_source = %source.id, error = %e, "ingestion trigger failed");
                    DispatchOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            };

            DispatchEntry {
                data_source: source.id,
                name: source.name,
                outcome,
            }
        }));
    }

    // Awaiting handles in spawn order keeps the report deterministic no
    // matter which trigger completes first.
    let mut entries = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(error = %e, "trigger task panicked");
            }
        }
    }

    let report = DispatchReport {
        knowledge_base: kb_id.clone(),
        entries,
    };

    info!(
        %kb_id,
        accepted = report.accepted(),
        failed = report.failed(),
        "dispatch complete"
    );

    Ok(report)
}
