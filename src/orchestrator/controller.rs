//! Prediction lifecycle controller.
//!
//! Owns cycle numbering and task spawning, and emits events for
//! presentation layers.

use crate::engine::PredictEngine;
use crate::model::{PredictEvent, SelectedPhoto};
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers to drive prediction cycles.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    /// Start a prediction cycle for this photo.
    Predict(SelectedPhoto),
    Quit,
}

/// Spawn one prediction cycle. Each task reports its own completion, so
/// the controller never blocks on an in-flight request; overlapping
/// cycles are allowed and the reducer's sequence guard makes superseded
/// completions inert.
fn start_cycle(
    engine: &PredictEngine,
    seq: u64,
    photo: SelectedPhoto,
    event_tx: UnboundedSender<PredictEvent>,
) {
    let engine = engine.clone();
    tokio::spawn(async move {
        match engine.run(&photo).await {
            Ok(report) => {
                let _ = event_tx.send(PredictEvent::Completed {
                    seq,
                    report: Box::new(report),
                });
            }
            Err(e) => {
                tracing::warn!(
                    "prediction cycle {} failed: {:#}",
                    seq,
                    anyhow::Error::from(e)
                );
                let _ = event_tx.send(PredictEvent::Failed { seq });
            }
        }
    });
}

/// Drive prediction cycles from UI commands and emit events back to
/// presentation layers.
pub(crate) async fn run_controller(
    engine: PredictEngine,
    event_tx: UnboundedSender<PredictEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    // Monotonic cycle counter. Only the latest issued value is live; the
    // reducer discards completions for anything older.
    let mut seq: u64 = 0;

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            UiCommand::Predict(photo) => {
                seq += 1;
                let _ = event_tx.send(PredictEvent::Started {
                    seq,
                    file_name: photo.file_name.clone(),
                });
                start_cycle(&engine, seq, photo, event_tx.clone());
            }
            // In-flight cycles are not cancelled; they die with the
            // runtime when main returns.
            UiCommand::Quit => break,
        }
    }

    Ok(())
}
