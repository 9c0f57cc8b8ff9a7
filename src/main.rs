use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::Config;
use core_types::Dimension;
use dataset::DatasetError;
use metrics::{BreakdownPolicy, BreakdownRow, MetricsEngine, SummaryReport};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// The main entry point for the Cartlens dashboard application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from an optional .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, config).await,
        Commands::Report(args) => handle_report(args, config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Cart-abandonment analytics over the latest exported order dataset.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard API server.
    Serve(ServeArgs),
    /// Print the summary and breakdown tables to the terminal.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct ReportArgs {
    /// How many states to show in the geographic table.
    #[arg(long)]
    states: Option<usize>,
}

// ==============================================================================
// Serve Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    web_server::run_server(config).await
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Loads the latest dataset and prints the terminal rendition of the
/// dashboard: headline metrics plus the three breakdown tables.
fn handle_report(args: ReportArgs, config: Config) -> anyhow::Result<()> {
    let loaded = match dataset::load_latest_dataset(&config.reports.dir) {
        Ok(loaded) => loaded,
        Err(DatasetError::NotFound(dir)) => {
            println!(
                "No analysis dataset found in {}. Run the analysis export first.",
                dir.display()
            );
            return Ok(());
        }
        Err(other) => return Err(other.into()),
    };

    println!(
        "Dataset: {} ({} orders)\n",
        loaded.source.display(),
        loaded.orders.len()
    );

    let engine = MetricsEngine::new();
    let summary = engine.summarize(&loaded.orders)?;
    print_summary(&summary);

    let category_policy = BreakdownPolicy {
        min_orders: config.breakdowns.category_min_orders,
        top_n: Some(config.breakdowns.category_top_n),
    };
    let categories = engine.breakdown(&loaded.orders, Dimension::Category, &category_policy)?;
    print_breakdown("Top Categories by Abandonment Rate", &categories);

    let payments = engine.breakdown(
        &loaded.orders,
        Dimension::PaymentType,
        &BreakdownPolicy::unfiltered(),
    )?;
    print_breakdown("Payment Methods", &payments);

    // The terminal report is the exploration view, so the geographic table
    // defaults to the wider top-N.
    let state_policy = BreakdownPolicy {
        min_orders: config.breakdowns.state_min_orders,
        top_n: Some(args.states.unwrap_or(config.breakdowns.state_top_n_explore)),
    };
    let states = engine.breakdown(&loaded.orders, Dimension::CustomerState, &state_policy)?;
    print_breakdown("Top States by Abandonment Rate", &states);

    Ok(())
}

fn print_summary(summary: &SummaryReport) {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        "Total Orders".to_string(),
        summary.total_orders.to_string(),
    ]);
    table.add_row(vec![
        "Abandoned Orders".to_string(),
        summary.abandoned_orders.to_string(),
    ]);
    table.add_row(vec![
        "Completed Orders".to_string(),
        summary.completed_orders.to_string(),
    ]);
    table.add_row(vec![
        "Abandonment Rate".to_string(),
        percent(summary.abandonment_rate),
    ]);
    table.add_row(vec![
        "Total Revenue".to_string(),
        money(summary.total_revenue),
    ]);
    table.add_row(vec![
        "Lost Revenue".to_string(),
        money(summary.lost_revenue),
    ]);
    table.add_row(vec![
        "Avg Cart Value".to_string(),
        money(summary.avg_cart_value),
    ]);
    table.add_row(vec![
        "Potential Recovery (10%)".to_string(),
        money(summary.potential_recovery_10pct),
    ]);
    println!("Executive Summary\n{table}\n");
}

fn print_breakdown(title: &str, rows: &[BreakdownRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        "Group",
        "Orders",
        "Abandoned",
        "Rate",
        "Revenue",
        "Avg Cart",
    ]);
    for row in rows {
        table.add_row(vec![
            row.group_key.clone(),
            row.total_orders.to_string(),
            row.abandoned_orders.to_string(),
            percent(row.abandonment_rate),
            money(row.total_revenue),
            money(row.avg_cart_value),
        ]);
    }
    println!("{title}\n{table}\n");
}

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).round_dp(1))
}

fn money(value: Decimal) -> String {
    format!("${}", value.round_dp(2))
}
