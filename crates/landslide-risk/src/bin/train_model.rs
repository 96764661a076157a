//! Train the debris-volume model and write its artifacts.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use landslide_risk::persist::{ArtifactStore, DEFAULT_DIR};
use landslide_risk::{Frame, TrainConfig, Trainer};

#[derive(Parser)]
#[command(name = "train-model", about = "Fit the landslide debris-volume model")]
struct Cli {
    /// Historical landslide records (CSV with header).
    #[arg(long, default_value = "deslizamentos.csv")]
    input: PathBuf,

    /// Directory receiving the model, scaler and column artifacts.
    #[arg(long, default_value = DEFAULT_DIR)]
    output_dir: PathBuf,

    /// Share of cleaned rows held out for evaluation.
    #[arg(long, default_value = "0.2")]
    test_size: f64,

    /// Seed for the train/test shuffle.
    #[arg(long, default_value = "42")]
    seed: u64,
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

    if !cli.input.is_file() {
        bail!(
            "training data {} not found; place the landslide CSV there or pass --input",
            cli.input.display()
        );
    }

    let config = TrainConfig::builder()
        .test_fraction(cli.test_size)
        .seed(cli.seed)
        .build()
        .context("invalid training configuration")?;

    let frame = Frame::from_csv_path(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    tracing::info!(rows = frame.n_rows(), columns = frame.n_columns(), "loaded training data");

    let outcome = Trainer::new(config).fit(frame).context("training failed")?;

    let store = ArtifactStore::new(cli.output_dir.clone());
    store.save(&outcome.model).context("failed to save artifacts")?;

    let eval = &outcome.evaluation;
    println!("Rows: {} train, {} test", eval.n_train, eval.n_test);
    println!("Features: {}", outcome.model.columns().len());
    println!("RMSE: {:.2} m³", eval.rmse);
    println!("R²: {:.4}", eval.r2);
    println!("Model:    {}", store.model_path().display());
    println!("Scaler:   {}", store.scaler_path().display());
    println!("Columns:  {}", store.columns_path().display());

    Ok(())
}
