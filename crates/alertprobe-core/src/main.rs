//! AlertProbe CLI
//!
//! Command-line interface for querying and conformance-testing alert backends.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use alertprobe::client::{collect_pages, AlertClient, AlertSource};
use alertprobe::conformance::{self, ScenarioRunner};
use alertprobe::models::time::start_of_record;
use alertprobe::models::{Alert, AlertFilter, AlertPage, TimeSlice};
use alertprobe::Config;

/// AlertProbe - ListAlerts client and conformance harness
#[derive(Parser)]
#[command(name = "alertprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ALERTPROBE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum StatusArg {
    #[default]
    Open,
    Closed,
    All,
}

#[derive(Subcommand)]
enum Commands {
    /// Query alerts for a tenant
    List {
        /// Tenant to query (defaults to the configured runner tenant)
        #[arg(long)]
        tenant: Option<String>,

        /// Only alerts whose internal client endpoint is in this zone
        #[arg(long)]
        zone: Option<String>,

        /// Relative start of the window (e.g. "1h", "7d")
        #[arg(long, conflicts_with = "start")]
        since: Option<humantime::Duration>,

        /// Absolute start of the window (RFC 3339)
        #[arg(long)]
        start: Option<DateTime<Utc>>,

        /// Absolute end of the window (RFC 3339, defaults to now)
        #[arg(long)]
        end: Option<DateTime<Utc>>,

        /// Which alert states to include
        #[arg(long, value_enum, default_value = "open")]
        status: StatusArg,

        /// Maximum alerts per page
        #[arg(long, default_value = "10")]
        page_size: u32,

        /// Continuation token from a previous page (also where --all-pages starts)
        #[arg(long, default_value = "")]
        token_page: String,

        /// Follow continuation tokens to the last page
        #[arg(long)]
        all_pages: bool,

        /// Page limit when following tokens
        #[arg(long, default_value = "100")]
        max_pages: usize,
    },

    /// Run the built-in conformance scenarios
    Check {
        /// Tenant to run against (defaults to the configured runner tenant)
        #[arg(long)]
        tenant: Option<String>,

        /// Run only the named scenarios
        #[arg(long)]
        only: Vec<String>,

        /// Per-scenario deadline (e.g. "30s")
        #[arg(long)]
        deadline: Option<humantime::Duration>,
    },

    /// List the built-in scenarios
    Scenarios,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    alertprobe::telemetry::init(&config.logging, cli.verbose);
    debug!(backend = ?config.backend, "Configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::List {
            tenant,
            zone,
            since,
            start,
            end,
            status,
            page_size,
            token_page,
            all_pages,
            max_pages,
        } => {
            let tenant = tenant.unwrap_or_else(|| config.runner.tenant_id.clone());
            let filter = match build_filter(zone, since, start, end, status) {
                Ok(filter) => filter,
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    return ExitCode::FAILURE;
                }
            };
            let paging = Paging {
                page_size,
                token: token_page,
                all_pages,
                max_pages,
            };
            run_list(&config, &tenant, &filter, paging, cli.format).await
        }
        Commands::Check {
            tenant,
            only,
            deadline,
        } => run_check(&config, tenant, &only, deadline, cli.format).await,
        Commands::Scenarios => run_scenarios(&config, cli.format),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

struct Paging {
    page_size: u32,
    token: String,
    all_pages: bool,
    max_pages: usize,
}

fn build_filter(
    zone: Option<String>,
    since: Option<humantime::Duration>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    status: StatusArg,
) -> anyhow::Result<AlertFilter> {
    let end = end.unwrap_or_else(Utc::now);
    let start = match (start, since) {
        (Some(start), _) => start,
        (None, Some(since)) => {
            let since = chrono::Duration::from_std(*since).context("--since is too large")?;
            end.checked_sub_signed(since)
                .context("--since reaches before the earliest representable instant")?
        }
        (None, None) => start_of_record(),
    };

    let builder = AlertFilter::builder(TimeSlice::new(start, end)).all_directions();
    let builder = match status {
        StatusArg::Open => builder.open(true),
        StatusArg::Closed => builder.closed(true),
        StatusArg::All => builder.list_all(true),
    };
    let filter = match zone {
        Some(zone) => builder.zone(zone),
        None => builder,
    }
    .build();

    filter.validate()?;
    Ok(filter)
}

async fn run_list(
    config: &Config,
    tenant: &str,
    filter: &AlertFilter,
    paging: Paging,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let client = AlertClient::new(&config.backend)?;
    info!(tenant, url = %client.list_url(), "Listing alerts");

    let page = if paging.all_pages {
        collect_pages(
            &client,
            tenant,
            filter,
            paging.page_size,
            &paging.token,
            paging.max_pages,
        )
        .await?
    } else {
        client
            .list_alerts(tenant, filter, paging.page_size, &paging.token)
            .await?
    };
    let AlertPage { alerts, next_token } = page;

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({ "alerts": alerts, "next_token": next_token });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            for alert in &alerts {
                println!("{}", format_alert(alert));
            }
            println!("{} alert(s)", alerts.len());
            if !next_token.is_empty() {
                println!("next page: --token-page {next_token}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn format_alert(alert: &Alert) -> String {
    let client = match alert.client.zone() {
        Some(zone) => format!("internal/{zone}"),
        None => alert.client.kind().to_string(),
    };
    let direction = alert
        .direction
        .map_or_else(|| "-".to_string(), |d| format!("{d:?}"));

    let state = format!("{:?}", alert.state);

    format!(
        "{}  {:<24} {:<6} {:<22} {}",
        alert.timestamp.to_rfc3339(),
        alert.alert_id,
        state,
        direction,
        client
    )
}

async fn run_check(
    config: &Config,
    tenant: Option<String>,
    only: &[String],
    deadline: Option<humantime::Duration>,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let tenant = tenant.unwrap_or_else(|| config.runner.tenant_id.clone());

    let mut scenarios = conformance::builtin(&tenant)?;
    if !only.is_empty() {
        if let Some(unknown) = only.iter().find(|n| !scenarios.iter().any(|s| &s.name == *n)) {
            bail!("unknown scenario '{unknown}'");
        }
        scenarios.retain(|s| only.contains(&s.name));
    }

    let client: Arc<dyn AlertSource> = Arc::new(AlertClient::new(&config.backend)?);
    let deadline = deadline.map_or(config.runner.deadline, Into::into);
    let runner = ScenarioRunner::new(client).with_deadline(deadline);

    let report = runner.run_all(&scenarios).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", report.render_text()),
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_scenarios(config: &Config, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let scenarios = conformance::builtin(&config.runner.tenant_id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&scenarios)?),
        OutputFormat::Text => {
            for scenario in &scenarios {
                println!("{}", scenario.name);
                println!("    {}", scenario.description);
                for expectation in &scenario.expectations {
                    println!("    expect {expectation:?}");
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
