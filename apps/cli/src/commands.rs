//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use agentsync_client::ControlPlaneClient;
use agentsync_core::dispatch::{DispatchOptions, DispatchOutcome};
use agentsync_core::pipeline::{self, ProgressReporter, SyncConfig, SyncReport};
use agentsync_shared::{AppConfig, init_config, load_config, resolve_api_token};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// agentsync — sync managed agent knowledge bases from the command line.
#[derive(Parser)]
#[command(
    name = "agentsync",
    version,
    about = "Resolve a managed agent by name and trigger ingestion jobs for its knowledge base.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Control-plane endpoint override (defaults to the configured value).
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Resolve an agent by name and trigger ingestion for all its data sources.
    Sync {
        /// Human-readable agent name (exact, case-sensitive).
        agent_name: String,

        /// Maximum concurrent trigger requests (defaults to the configured value).
        #[arg(long)]
        concurrency: Option<u32>,
    },

    /// Invoke an agent through its first routable alias and print the completion.
    Invoke {
        /// Human-readable agent name (exact, case-sensitive).
        agent_name: String,

        /// Input text to send to the agent.
        input: String,
    },

    /// List all agents known to the control plane.
    List,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "agentsync=info",
        1 => "agentsync=debug",
        _ => "agentsync=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sync {
            ref agent_name,
            concurrency,
        } => cmd_sync(&cli, agent_name, concurrency).await,
        Command::Invoke {
            ref agent_name,
            ref input,
        } => cmd_invoke(&cli, agent_name, input).await,
        Command::List => cmd_list(&cli).await,
        Command::Config { ref action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Build a control-plane client from config + CLI overrides.
fn build_client(cli: &Cli, config: &AppConfig) -> Result<ControlPlaneClient> {
    let endpoint = cli
        .endpoint
        .as_deref()
        .unwrap_or(&config.control_plane.endpoint);
    let token = resolve_api_token(config)?;

    Ok(ControlPlaneClient::new(
        endpoint,
        &token,
        config.control_plane.timeout_secs,
    )?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_sync(cli: &Cli, agent_name: &str, concurrency: Option<u32>) -> Result<()> {
    // Validate input before touching config or network.
    if agent_name.trim().is_empty() {
        return Err(eyre!("usage error: agent name must not be empty"));
    }

    let config = load_config()?;
    let client = build_client(cli, &config)?;

    let sync_config = SyncConfig {
        agent_name: agent_name.to_string(),
        dispatch: DispatchOptions {
            concurrency: concurrency.unwrap_or(config.dispatch.concurrency),
        },
    };

    info!(agent_name, "syncing agent knowledge base");

    let reporter = CliProgress::new();
    let report = pipeline::sync_agent(&client, &sync_config, &reporter).await?;

    // Print summary
    println!();
    println!("  Agent:          {} ({})", report.agent_name, report.agent_id);
    println!("  Version:        {}", report.version);
    println!("  Knowledge base: {}", report.knowledge_base);
    println!();

    if report.dispatch.entries.is_empty() {
        println!("  No data sources to ingest.");
    } else {
        for entry in &report.dispatch.entries {
            let label = entry.name.as_deref().unwrap_or(entry.data_source.as_str());
            match &entry.outcome {
                DispatchOutcome::Accepted { job_id } => {
                    println!("  ✓ {label}: ingestion job {job_id} started");
                }
                DispatchOutcome::Failed { message } => {
                    println!("  ✗ {label}: {message}");
                }
            }
        }
        println!();
        println!(
            "  {} accepted, {} failed",
            report.dispatch.accepted(),
            report.dispatch.failed()
        );
    }
    println!("  Time: {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_invoke(cli: &Cli, agent_name: &str, input: &str) -> Result<()> {
    if agent_name.trim().is_empty() {
        return Err(eyre!("usage error: agent name must not be empty"));
    }

    let config = load_config()?;
    let client = build_client(cli, &config)?;

    info!(agent_name, "invoking agent");

    let report = pipeline::invoke_agent(&client, agent_name, input).await?;

    println!("{}", report.completion);
    Ok(())
}

async fn cmd_list(cli: &Cli) -> Result<()> {
    let config = load_config()?;
    let client = build_client(cli, &config)?;

    let agents = client.list_agents().await?;

    if agents.is_empty() {
        println!("No agents found.");
        return Ok(());
    }

    println!("{:<24} {:<16} DESCRIPTION", "NAME", "ID");
    for agent in agents {
        println!(
            "{:<24} {:<16} {}",
            agent.name,
            agent.id,
            agent.description.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _report: &SyncReport) {
        self.spinner.finish_and_clear();
    }
}
