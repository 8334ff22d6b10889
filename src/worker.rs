use crate::engine::PriceEstimator;
use crate::tui::{state::AppState, TuiCommand};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Serve submissions until `Quit` or until the TUI drops its sender.
pub async fn run_engine(
    estimator: PriceEstimator,
    mut cmd_rx: mpsc::Receiver<TuiCommand>,
    state_tx: watch::Sender<AppState>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            TuiCommand::Quit => return,
            TuiCommand::Submit(input) => {
                let summary = input.summary();
                match estimator.estimate(&input) {
                    Ok(estimate) => {
                        tracing::info!(
                            listing = %summary,
                            raw = estimate.prediction.raw,
                            price = estimate.prediction.price,
                            backfilled = ?estimate.backfilled,
                            "prediction"
                        );
                        state_tx.send_modify(|s| s.record_success(summary, &estimate));
                    }
                    Err(e) => {
                        tracing::warn!(listing = %summary, error = %format!("{:#}", e), "prediction failed");
                        state_tx.send_modify(|s| s.record_failure(summary, &e));
                    }
                }
            }
        }
    }
}

/// Wait for the engine task. Returns false (and logs) if it panicked or was
/// cancelled.
pub async fn join_engine(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) if e.is_panic() => {
            tracing::error!(error = %e, "engine task panicked");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "engine task did not finish");
            false
        }
    }
}
