use crate::error::AnalysisError;
use crate::models::analysis_types::AnalysisResult;
use crate::models::upload_types::{
    ProgressUpdate, SelectedFile, SessionSnapshot, SessionState, UploadSlot,
};
use crate::services::analysis_client::AnalysisClient;
use crate::services::progress::{ProgressHandle, ProgressSimulator};
use crate::services::transformer;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

/// How long the progress display lingers after an attempt settles.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Invoked once per successful analysis, outside the session lock.
pub type CompletionCallback = Arc<dyn Fn(AnalysisResult) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct SessionTiming {
    pub simulator: ProgressSimulator,
    pub settle_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            simulator: ProgressSimulator::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

struct SessionInner {
    state: SessionState,
    // restored when a drag leaves without dropping
    before_drag: Option<SessionState>,
    file_name: Option<String>,
    display: ProgressUpdate,
    attempt: u64,
    ticker: Option<ProgressHandle>,
    settle: Option<AbortHandle>,
}

/// Lifecycle of the one file tracked by an upload slot.
///
/// Operations that start work spawn onto the ambient tokio runtime, so they
/// must be called from within one. Clones share the same session.
#[derive(Clone)]
pub struct UploadSession {
    slot: UploadSlot,
    client: Arc<dyn AnalysisClient>,
    timing: SessionTiming,
    on_complete: Option<CompletionCallback>,
    inner: Arc<Mutex<SessionInner>>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
}

impl UploadSession {
    pub fn new(slot: UploadSlot, client: Arc<dyn AnalysisClient>, timing: SessionTiming) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::idle(slot));
        Self {
            slot,
            client,
            timing,
            on_complete: None,
            inner: Arc::new(Mutex::new(SessionInner {
                state: SessionState::Idle,
                before_drag: None,
                file_name: None,
                display: ProgressUpdate::idle(),
                attempt: 0,
                ticker: None,
                settle: None,
            })),
            snapshots: Arc::new(tx),
        }
    }

    pub fn with_completion(mut self, on_complete: CompletionCallback) -> Self {
        self.on_complete = Some(on_complete);
        self
    }

    pub fn slot(&self) -> UploadSlot {
        self.slot
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn drag_enter(&self) {
        let mut inner = self.lock();
        if inner.state.is_analyzing() || inner.state == SessionState::Dragging {
            return;
        }
        let previous = std::mem::replace(&mut inner.state, SessionState::Dragging);
        inner.before_drag = Some(previous);
        self.publish(&inner);
    }

    pub fn drag_leave(&self) {
        let mut inner = self.lock();
        if inner.state != SessionState::Dragging {
            return;
        }
        inner.state = inner.before_drag.take().unwrap_or(SessionState::Idle);
        self.publish(&inner);
    }

    /// A file released over the slot. Ends the drag, then behaves like
    /// [`select_file`](Self::select_file).
    pub fn drop_file(&self, file: SelectedFile) -> bool {
        {
            let mut inner = self.lock();
            if inner.state == SessionState::Dragging {
                inner.state = inner.before_drag.take().unwrap_or(SessionState::Idle);
            }
        }
        self.select_file(file)
    }

    /// Returns `false` and leaves the session untouched while an analysis
    /// is in flight.
    pub fn select_file(&self, file: SelectedFile) -> bool {
        info!(
            "[{:?}] File selected: {} ({}, {} bytes)",
            self.slot,
            file.name,
            file.mime,
            file.bytes.len()
        );
        self.begin_analysis(file)
    }

    pub fn begin_analysis(&self, file: SelectedFile) -> bool {
        let attempt = {
            let mut inner = self.lock();
            if inner.state.is_analyzing() {
                warn!(
                    "[{:?}] Ignoring {} while another analysis is in flight",
                    self.slot, file.name
                );
                return false;
            }
            if let Some(settle) = inner.settle.take() {
                settle.abort();
            }
            inner.before_drag = None;
            inner.attempt += 1;
            inner.file_name = Some(file.name.clone());

            let initial = ProgressSimulator::initial();
            inner.state = SessionState::Analyzing {
                progress: initial.progress,
                stage: initial.stage.clone(),
            };
            inner.display = initial;

            let attempt = inner.attempt;
            let ticking = self.clone();
            inner.ticker = Some(
                self.timing
                    .simulator
                    .start(move |update| ticking.apply_progress(attempt, update)),
            );
            self.publish(&inner);
            attempt
        };

        debug!("[{:?}] Attempt {} dispatched", self.slot, attempt);
        let session = self.clone();
        tokio::spawn(async move {
            let outcome = session
                .client
                .analyze(file)
                .await
                .map(|raw| transformer::transform(&raw));
            session.finish(attempt, outcome);
        });
        true
    }

    /// Clears the file and any failure. Refused while analyzing; an
    /// in-flight request is never cancelled.
    pub fn remove_file(&self) -> bool {
        let mut inner = self.lock();
        if inner.state.is_analyzing() {
            return false;
        }
        inner.file_name = None;
        inner.before_drag = None;
        inner.state = SessionState::Idle;
        self.publish(&inner);
        true
    }

    fn apply_progress(&self, attempt: u64, update: ProgressUpdate) {
        let mut inner = self.lock();
        if inner.attempt != attempt {
            return;
        }
        if let SessionState::Analyzing { progress, stage } = &mut inner.state {
            *progress = update.progress;
            *stage = update.stage.clone();
        } else {
            return;
        }
        inner.display = update;
        self.publish(&inner);
    }

    fn finish(&self, attempt: u64, outcome: Result<AnalysisResult, AnalysisError>) {
        let completed = {
            let mut inner = self.lock();
            if inner.attempt != attempt || !inner.state.is_analyzing() {
                debug!("[{:?}] Dropping stale outcome of attempt {}", self.slot, attempt);
                return;
            }
            if let Some(ticker) = inner.ticker.take() {
                ticker.cancel();
            }

            let completed = match outcome {
                Ok(result) => {
                    info!(
                        "[{:?}] Analysis complete: {} is_deepfake={} confidence={}",
                        self.slot, result.file_name, result.is_deepfake, result.confidence
                    );
                    inner.state = SessionState::Complete {
                        result: result.clone(),
                    };
                    Some(result)
                }
                Err(err) => {
                    warn!("[{:?}] Analysis failed: {}", self.slot, err);
                    inner.state = SessionState::Failed {
                        message: err.to_string(),
                    };
                    None
                }
            };
            self.publish(&inner);
            inner.settle = Some(self.schedule_settle(attempt));
            completed
        };

        if let (Some(result), Some(on_complete)) = (completed, &self.on_complete) {
            on_complete(result);
        }
    }

    fn schedule_settle(&self, attempt: u64) -> AbortHandle {
        let session = self.clone();
        let delay = self.timing.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = session.lock();
            if inner.attempt != attempt {
                return;
            }
            inner.settle = None;
            inner.display = ProgressUpdate::idle();
            session.publish(&inner);
        })
        .abort_handle()
    }

    fn publish(&self, inner: &SessionInner) {
        self.snapshots.send_replace(SessionSnapshot {
            slot: self.slot,
            state: inner.state.clone(),
            file_name: inner.file_name.clone(),
            progress: inner.display.progress,
            stage: inner.display.stage.clone(),
        });
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
