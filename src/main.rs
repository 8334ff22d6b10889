use anyhow::{Context, Result};
use listing_price::config::Config;
use listing_price::engine::PriceEstimator;
use listing_price::tui::{self, form::FormState, state::AppState, TuiCommand};
use listing_price::worker;
use std::path::PathBuf;
use tokio::sync::{mpsc, watch};

const DEFAULT_CONFIG: &str = "config.toml";

/// `--config <path>`, defaulting to ./config.toml.
fn config_path() -> Result<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().context("--config requires a path")?;
            return Ok(PathBuf::from(path));
        }
    }
    Ok(PathBuf::from(DEFAULT_CONFIG))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load(&config_path()?)?;

    let log_file = std::fs::File::create(&config.logging.file)
        .with_context(|| format!("Failed to create log file: {}", config.logging.file))?;
    tracing_subscriber::fmt()
        .with_env_filter(config.logging.filter.as_str())
        .with_ansi(false)
        .with_writer(log_file)
        .init();

    // The model is loaded once; without it there is nothing to serve.
    let estimator = PriceEstimator::load(&config.model, config.constants.clone())?;

    let schema = estimator.schema();
    let mut initial = AppState::new(
        estimator.label(),
        schema.categorical().count(),
        schema.numerical().count(),
    );
    initial.push_log("INFO", format!("loaded {} from {}", estimator.label(), config.model.path));

    let (state_tx, state_rx) = watch::channel(initial);
    let (cmd_tx, cmd_rx) = mpsc::channel::<TuiCommand>(16);

    // --- Engine: one inference per submission ---
    let engine = tokio::spawn(worker::run_engine(estimator, cmd_rx, state_tx));

    // --- Form (blocks until quit) ---
    let form = FormState::new(&config.form, &config.constants);
    tui::run_tui(form, state_rx, cmd_tx).await?;

    worker::join_engine(engine).await;
    tracing::debug!("shutting down");
    Ok(())
}
