// ReviewScope - app/load.rs
//
// Dataset load lifecycle. Reads and scores a CSV on a background thread,
// sending progress messages to the UI thread via an mpsc channel.
//
// Architecture:
//   - `LoadManager` lives on the UI thread; `run_load` runs on a background thread.
//   - An `Arc<AtomicBool>` cancel flag lets the UI stop the load cooperatively.
//   - All cross-thread communication is via `LoadProgress` channel messages.
//   - Cancel is checked at every progress tick and between phases.

use crate::core::dataset::{self, LoadConfig, ReadOutcome};
use crate::core::model::LoadProgress;
use crate::core::sentiment::Lexicon;
use crate::util::constants;
use crate::util::error::DatasetError;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

// =============================================================================
// LoadManager
// =============================================================================

/// Manages a dataset load on a background thread.
pub struct LoadManager {
    /// Channel receiver for the UI to poll progress messages.
    progress_rx: Option<mpsc::Receiver<LoadProgress>>,

    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl LoadManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start loading `path`. If a load is already running it is cancelled
    /// first and its remaining messages are discarded.
    pub fn start_load(&mut self, path: PathBuf, config: LoadConfig, lexicon: Arc<Lexicon>) {
        self.cancel_load();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        std::thread::spawn(move || {
            run_load(path, config, &lexicon, tx, cancel);
        });

        tracing::info!("Load started");
    }

    /// Request cancellation of the running load.
    /// The background thread sends `LoadProgress::Cancelled` and exits.
    pub fn cancel_load(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
        self.cancel_flag = None;
    }

    /// Whether a load thread is still attached.
    pub fn is_running(&self) -> bool {
        self.progress_rx.is_some()
    }

    /// Drain at most `MAX_LOAD_MESSAGES_PER_FRAME` pending messages without
    /// blocking. The channel is released once a terminal message arrives or
    /// the sender hangs up.
    pub fn poll_progress(&mut self) -> Vec<LoadProgress> {
        let mut messages = Vec::new();
        let mut finished = false;

        if let Some(ref rx) = self.progress_rx {
            while messages.len() < constants::MAX_LOAD_MESSAGES_PER_FRAME {
                match rx.try_recv() {
                    Ok(msg) => {
                        let terminal = matches!(
                            msg,
                            LoadProgress::Completed { .. }
                                | LoadProgress::Failed { .. }
                                | LoadProgress::Cancelled
                        );
                        messages.push(msg);
                        if terminal {
                            finished = true;
                            break;
                        }
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }

        if finished {
            self.progress_rx = None;
            self.cancel_flag = None;
        }
        messages
    }
}

impl Default for LoadManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Background load pipeline
// =============================================================================

/// Load pipeline: open → bounded read → parallel scoring → summary.
///
/// Runs on a background thread. Sends `LoadProgress` messages to `tx`.
fn run_load(
    path: PathBuf,
    config: LoadConfig,
    lexicon: &Lexicon,
    tx: mpsc::Sender<LoadProgress>,
    cancel: Arc<AtomicBool>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                return; // Receiver dropped (UI closed or new load); exit quietly.
            }
        };
    }

    macro_rules! check_cancel {
        () => {
            if cancel.load(Ordering::SeqCst) {
                tracing::info!("Load cancelled");
                send!(LoadProgress::Cancelled);
                return;
            }
        };
    }

    let started = Instant::now();
    send!(LoadProgress::Started { path: path.clone() });

    // -------------------------------------------------------------------------
    // Phase 1: bounded read
    // -------------------------------------------------------------------------
    if !path.exists() {
        let err = DatasetError::NotFound { path: path.clone() };
        tracing::error!(error = %err, "Load failed");
        send!(LoadProgress::Failed {
            error: err.to_string()
        });
        return;
    }
    let file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            let err = DatasetError::Io {
                path: path.clone(),
                source: e,
            };
            tracing::error!(error = %err, "Load failed");
            send!(LoadProgress::Failed {
                error: err.to_string()
            });
            return;
        }
    };

    let tx_progress = tx.clone();
    let read = dataset::read_rows(file, &path, &config, |rows| {
        // Non-fatal: ignore send error (UI may have closed).
        let _ = tx_progress.send(LoadProgress::RowsRead { rows });
        if cancel.load(Ordering::SeqCst) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    let ReadOutcome { rows, mut meta } = match read {
        Ok(Some(outcome)) => outcome,
        Ok(None) => {
            tracing::info!("Load cancelled");
            send!(LoadProgress::Cancelled);
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "Load failed");
            send!(LoadProgress::Failed {
                error: e.to_string()
            });
            return;
        }
    };

    for message in std::mem::take(&mut meta.warnings) {
        send!(LoadProgress::Warning { message });
    }

    check_cancel!();

    // -------------------------------------------------------------------------
    // Phase 2: scoring
    // -------------------------------------------------------------------------
    send!(LoadProgress::Scoring { rows: rows.len() });
    let records = dataset::score_rows(rows, lexicon);

    check_cancel!();

    let outcome = dataset::finish_load(path, meta, records, config.max_rows, started.elapsed());

    tracing::info!(
        rows = outcome.summary.rows_loaded,
        skipped = outcome.summary.rows_skipped,
        truncated = outcome.summary.truncated,
        elapsed_ms = outcome.summary.duration.as_millis() as u64,
        "Load complete"
    );

    send!(LoadProgress::Completed {
        dataset: Box::new(outcome.dataset),
        summary: outcome.summary,
    });
}
