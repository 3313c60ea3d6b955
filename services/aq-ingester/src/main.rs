//! Air quality forecast ingester.
//!
//! Resolves a CAMS NetCDF forecast file from the data directory, ingests
//! its records into PostgreSQL with content-hash deduplication, and can
//! export the grid-cell GeoJSON used to join forecasts to geometry.

mod resolve;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use forecast_grid::{CellCollection, NetcdfDataset};
use forecast_store::{ingest, ForecastSink, MemoryForecastSink, PgForecastSink};

#[derive(Parser, Debug)]
#[command(name = "aq-ingester")]
#[command(about = "Air quality forecast ingester")]
struct Args {
    /// Directory searched for forecast files
    #[arg(long, default_value = "data/netcdf")]
    data_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest one variable of a forecast file into the database
    Ingest {
        /// Forecast file name, partial path or absolute path (.nc optional)
        file: String,

        /// Raw dataset field to ingest
        #[arg(short, long, default_value = "pm10_conc")]
        variable: String,

        /// Run the full ingestion against an in-memory sink
        #[arg(long)]
        dry_run: bool,
    },

    /// Export the grid-cell polygons of a forecast file as GeoJSON
    Cells {
        /// Forecast file name, partial path or absolute path (.nc optional)
        file: String,

        /// Output file for the GeoJSON feature collection
        #[arg(short, long, default_value = "cells.geojson")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    dotenvy::dotenv().ok();

    match args.command {
        Command::Ingest {
            file,
            variable,
            dry_run,
        } => run_ingest(&args.data_dir, &file, &variable, dry_run).await,
        Command::Cells { file, output } => run_cells(&args.data_dir, &file, &output),
    }
}

async fn run_ingest(
    data_dir: &std::path::Path,
    file: &str,
    variable: &str,
    dry_run: bool,
) -> Result<()> {
    let path = resolve::resolve(data_dir, file)?;
    info!(file = %path.display(), variable = %variable, "Opening forecast file");

    let dataset = NetcdfDataset::open(&path)?;

    let result = if dry_run {
        let sink = MemoryForecastSink::new();
        ingest(&dataset, variable, &sink).await?
    } else {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let sink = PgForecastSink::connect(&database_url).await?;
        sink.migrate().await?;
        let result = ingest(&dataset, variable, &sink).await?;
        info!(stored = sink.count().await?, "Database record count");
        result
    };

    info!(
        variable = %result.variable,
        model = %result.model,
        seen = result.records_seen,
        written = result.records_written,
        dry_run = dry_run,
        "Ingestion finished"
    );

    Ok(())
}

fn run_cells(data_dir: &std::path::Path, file: &str, output: &std::path::Path) -> Result<()> {
    let path = resolve::resolve(data_dir, file)?;
    info!(file = %path.display(), "Opening forecast file");

    let dataset = NetcdfDataset::open(&path)?;
    let cells = CellCollection::from_dataset(&dataset);

    let json = serde_json::to_string(&cells)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        features = cells.len(),
        output = %output.display(),
        "Wrote grid-cell GeoJSON"
    );

    Ok(())
}
