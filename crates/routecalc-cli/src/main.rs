mod compute;
mod workbook;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use routecalc_core::{TravelMode, DRIVING_STRATEGIES};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "routecalc")]
#[command(about = "Batch distance and travel time calculation through the AMap API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the tables of a workbook with their location and number fields.
    Tables {
        #[arg(long)]
        workbook: PathBuf,
    },
    /// List the known driving strategy codes.
    Strategies,
    /// Compute distance/duration for every record of a table.
    Compute(ComputeArgs),
}

#[derive(Debug, Args)]
struct ComputeArgs {
    #[arg(long)]
    workbook: PathBuf,
    #[arg(long)]
    table: String,
    #[arg(long)]
    origin_field: String,
    #[arg(long)]
    destination_field: String,
    /// direct, driving, walking, bicycling or transit.
    #[arg(long)]
    mode: TravelMode,
    /// Provider strategy code (driving and transit only).
    #[arg(long)]
    strategy: Option<String>,
    /// Number field receiving the distance in km.
    #[arg(long)]
    distance_field: Option<String>,
    /// Number field receiving the duration in minutes.
    #[arg(long)]
    duration_field: Option<String>,
    /// Overrides `AMAP_API_KEY`.
    #[arg(long)]
    api_key: Option<String>,
    /// Overrides `ROUTECALC_BATCH_SIZE`.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    batch_size: Option<u16>,
    /// Also print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(routecalc_core::load_log_level()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Tables { workbook } => compute::run_list_tables(&workbook).await,
        Commands::Strategies => {
            print_strategies();
            Ok(())
        }
        Commands::Compute(args) => compute::run_compute(args).await,
    }
}

fn print_strategies() {
    println!("driving strategies (--strategy CODE):");
    for (code, label) in DRIVING_STRATEGIES {
        println!("  {code:>3}  {label}");
    }
    println!("other codes are passed through to the provider unchanged");
}
