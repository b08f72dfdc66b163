use crate::models::upload_types::UploadSlot;
use crate::services::analysis_client::AnalysisClient;
use crate::services::upload_session::{CompletionCallback, SessionTiming, UploadSession};
use crate::services::view_model::{AnalysisViewModel, ViewState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::info;

/// The upload page: one independent session per slot, all reporting into a
/// single view model.
pub struct AnalysisBoard {
    sessions: HashMap<UploadSlot, UploadSession>,
    view_model: Arc<Mutex<AnalysisViewModel>>,
    view_tx: Arc<watch::Sender<ViewState>>,
}

impl AnalysisBoard {
    pub fn new(client: Arc<dyn AnalysisClient>, timing: SessionTiming) -> Self {
        let view_model = Arc::new(Mutex::new(AnalysisViewModel::new()));
        let (tx, _rx) = watch::channel(ViewState::Idle);
        let view_tx = Arc::new(tx);

        let sessions = UploadSlot::ALL
            .iter()
            .map(|&slot| {
                let vm = view_model.clone();
                let tx = view_tx.clone();
                let on_complete: CompletionCallback = Arc::new(move |result| {
                    let mut vm = lock(&vm);
                    vm.complete_analysis(result);
                    tx.send_replace(vm.state().clone());
                });
                let session = UploadSession::new(slot, client.clone(), timing.clone())
                    .with_completion(on_complete);
                (slot, session)
            })
            .collect();

        Self {
            sessions,
            view_model,
            view_tx,
        }
    }

    pub fn session(&self, slot: UploadSlot) -> &UploadSession {
        &self.sessions[&slot]
    }

    pub fn sessions(&self) -> impl Iterator<Item = &UploadSession> {
        UploadSlot::ALL.iter().map(move |slot| &self.sessions[slot])
    }

    pub fn view_state(&self) -> ViewState {
        lock(&self.view_model).state().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view_tx.subscribe()
    }

    /// "New Analysis": back to the upload page. Slot sessions keep their
    /// own state.
    pub fn reset(&self) {
        let mut vm = lock(&self.view_model);
        vm.reset();
        self.view_tx.send_replace(vm.state().clone());
        info!("Analysis view reset");
    }
}

fn lock(vm: &Mutex<AnalysisViewModel>) -> MutexGuard<'_, AnalysisViewModel> {
    vm.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
