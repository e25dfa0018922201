use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use readmit_cli::{DiscoveryConfig, YearDistribution, discover, encounter_span, process};
use readmit_core::PatientFeatures;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "readmit")]
#[command(about = "Patient features and 30-day readmission labels from FHIR bundles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one JSON line of features per patient to stdout
    Features {
        /// Directory containing one bundle per patient
        dir: PathBuf,
        /// Only process the first N bundles (by file name)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print how many encounters started in each year
    Years {
        /// Directory containing one bundle per patient
        dir: PathBuf,
        /// Only process the first N bundles (by file name)
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Features { dir, limit } => features(DiscoveryConfig::new(dir).with_limit(limit)),
        Commands::Years { dir, limit } => years(DiscoveryConfig::new(dir).with_limit(limit)),
    }
}

fn features(config: DiscoveryConfig) -> Result<()> {
    let paths = discover(&config)?;
    tracing::info!("Found {} patient files", paths.len());

    let report = process(&paths, PatientFeatures::derive);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for row in report.succeeded() {
        serde_json::to_writer(&mut out, row)?;
        writeln!(out)?;
    }
    out.flush()?;

    report.log_summary();
    Ok(())
}

fn years(config: DiscoveryConfig) -> Result<()> {
    let paths = discover(&config)?;
    tracing::info!("Found {} patient files", paths.len());

    let report = process(&paths, |record| Ok(record.clone()));

    let mut out = io::stdout().lock();
    if let Some(first) = report.succeeded().next() {
        writeln!(
            out,
            "Example patient birth: {}",
            first.birth_date.as_deref().unwrap_or("unknown")
        )?;
        writeln!(out, "Encounters: {}", first.encounters.len())?;
        if let Some((earliest, latest)) = encounter_span(first) {
            writeln!(out, "First encounter: {earliest}")?;
            writeln!(out, "Last encounter: {latest}")?;
        }
        writeln!(out)?;
    }

    let distribution = YearDistribution::from_records(report.succeeded());
    writeln!(
        out,
        "Year distribution ({} patients, {} encounters)",
        report.outcomes.len() - report.failure_count(),
        distribution.total()
    )?;
    write!(out, "{distribution}")?;
    out.flush()?;

    report.log_summary();
    Ok(())
}
