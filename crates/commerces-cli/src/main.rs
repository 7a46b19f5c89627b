mod report;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use commerces_catalog::Catalog;
use commerces_core::{AppConfig, Dataset, DatasetView};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "commerces")]
#[command(about = "Browse the RATP catalog of approved local businesses")]
struct Cli {
    /// Catalog records endpoint (defaults to COMMERCES_API_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Record filters shared by every command. An empty list keeps everything.
#[derive(Debug, Args)]
struct FilterArgs {
    /// Keep only this commerce type (repeatable)
    #[arg(long = "type", value_name = "TYPE", global = true)]
    types: Vec<String>,

    /// Keep only this commune (repeatable)
    #[arg(long = "commune", value_name = "COMMUNE", global = true)]
    communes: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Headline counts: businesses, types, communes, located records
    Summary,
    /// Businesses per commerce type
    Types {
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Businesses per commune
    Communes {
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Commerce types against the most frequent communes
    Crosstab {
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Located businesses as GeoJSON
    Map,
    /// Per-business details
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Filtered dataset as JSON
    Raw,
    /// Businesses per month of their creation date
    Timeline {
        /// Date field to group by (defaults to date_creation, then date)
        #[arg(long)]
        field: Option<String>,
    },
    /// Data source description
    Source,
    /// Print the summary repeatedly, refetching only when the cache expires
    Watch {
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = commerces_core::load_app_config(cli.url.as_deref())?;
    init_tracing(&config);

    let catalog = Catalog::from_config(&config)?;
    let api_url = config.api_url.clone();

    match cli.command {
        Some(Commands::Watch { interval_secs }) => {
            watch(&catalog, &api_url, &cli.filters, interval_secs).await
        }
        command => {
            let command = command.unwrap_or(Commands::Summary);
            run(&catalog, &api_url, &cli.filters, command).await
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load(catalog: &Catalog, api_url: &str) -> anyhow::Result<Arc<Dataset>> {
    catalog.load(api_url).await.with_context(|| {
        format!(
            "could not load the business catalog from {api_url}; \
             check the network connection or COMMERCES_API_URL"
        )
    })
}

async fn run(
    catalog: &Catalog,
    api_url: &str,
    filters: &FilterArgs,
    command: Commands,
) -> anyhow::Result<()> {
    let dataset = load(catalog, api_url).await?;
    let loaded_at = chrono::Utc::now();
    let view = DatasetView::new(&dataset)
        .with_types(&filters.types)
        .with_communes(&filters.communes);
    tracing::debug!(total = dataset.len(), selected = view.len(), "dataset filtered");

    let mut out = std::io::stdout().lock();
    match command {
        Commands::Summary | Commands::Watch { .. } => report::write_summary(&mut out, &view)?,
        Commands::Types { top } => {
            report::write_counts(&mut out, "type", &view.type_counts(), top)?;
        }
        Commands::Communes { top } => {
            report::write_counts(&mut out, "commune", &view.commune_counts(), top)?;
        }
        Commands::Crosstab { top } => report::write_crosstab(&mut out, &view, top)?,
        Commands::Map => {
            report::write_map_stats(&mut std::io::stderr().lock(), &view)?;
            serde_json::to_writer_pretty(&mut out, &report::geojson(&view))?;
            writeln!(out)?;
        }
        Commands::List { limit } => report::write_details(&mut out, &view, limit)?,
        Commands::Raw => {
            let records: Vec<_> = view.iter().collect();
            serde_json::to_writer_pretty(&mut out, &records)?;
            writeln!(out)?;
        }
        Commands::Timeline { field } => {
            report::write_timeline(&mut out, &view, field.as_deref())?;
        }
        Commands::Source => report::write_source(&mut out, api_url, dataset.len(), loaded_at)?,
    }
    Ok(())
}

async fn watch(
    catalog: &Catalog,
    api_url: &str,
    filters: &FilterArgs,
    interval_secs: u64,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        ticker.tick().await;
        match run(catalog, api_url, filters, Commands::Summary).await {
            Ok(()) => println!(),
            Err(e) => tracing::error!(error = %format!("{e:#}"), "catalog refresh failed"),
        }
    }
}

#[cfg(test)]
mod tests;
