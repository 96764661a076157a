//! Score landslide sites with a trained model.
//!
//! Subcommands:
//!   bulk    -- score every row of a CSV and write it back with predictions
//!   manual  -- score one site described on the command line

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use landslide_risk::persist::{ArtifactStore, DEFAULT_DIR};
use landslide_risk::{Frame, ManualInput, RiskModel, RiskThreshold};

#[derive(Parser)]
#[command(name = "assess-risk", about = "Landslide debris-volume risk assessment")]
struct Cli {
    /// Directory holding the trained artifacts.
    #[arg(long, global = true, default_value = DEFAULT_DIR)]
    artifacts: PathBuf,

    /// Volume (m³) at or above which a site is high risk, within [0, 50000].
    #[arg(long, global = true, default_value = "100")]
    threshold: RiskThreshold,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every row of an uploaded CSV table.
    Bulk {
        /// Table to score (CSV with header).
        #[arg(long)]
        input: PathBuf,

        /// Destination CSV; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Score a single site.
    Manual {
        /// Precipitation over the last 24 hours (mm).
        #[arg(long)]
        precipitation: f64,

        /// Terrain slope (degrees).
        #[arg(long)]
        slope: f64,

        /// Hour of day, 0-23.
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
        hour: u32,

        #[arg(long)]
        soil: String,

        #[arg(long)]
        vegetation: String,

        #[arg(long)]
        landslide_type: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let model = ArtifactStore::new(cli.artifacts.clone())
        .load()
        .context("trained artifacts unavailable; run train-model first")?;

    match cli.command {
        Command::Bulk { input, output } => bulk(&model, cli.threshold, &input, output),
        Command::Manual {
            precipitation,
            slope,
            hour,
            soil,
            vegetation,
            landslide_type,
        } => {
            let input = ManualInput {
                precipitation_mm_24h: precipitation,
                slope_degrees: slope,
                hour,
                soil_type: soil,
                vegetation_cover: vegetation,
                landslide_type,
            };
            manual(&model, cli.threshold, &input)
        }
    }
}

fn bulk(
    model: &RiskModel,
    threshold: RiskThreshold,
    input: &Path,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let frame = Frame::from_csv_path(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let scored = model.score_frame(&frame, threshold).context("scoring failed")?;

    match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            scored.frame.write_csv(BufWriter::new(file))?;
        }
        None => scored.frame.write_csv(io::stdout().lock())?,
    }

    let summary = scored.summary();
    eprintln!(
        "{} rows scored at threshold {}: {} high risk, {} low risk",
        scored.frame.n_rows(),
        threshold,
        summary.high,
        summary.low
    );
    Ok(())
}

fn manual(model: &RiskModel, threshold: RiskThreshold, input: &ManualInput) -> anyhow::Result<()> {
    let assessment = model.assess(input, threshold).context("scoring failed")?;
    println!("Estimated volume: {:.2} m³", assessment.volume);
    println!("Classification:   {}", assessment.class);
    println!("Threshold:        {}", assessment.threshold);
    println!("Severity:         {:.0}%", assessment.severity * 100.0);
    Ok(())
}
