use crate::config::Config;
use crate::error::AppError;
use crate::models::analysis_types::AnalysisResult;
use crate::models::upload_types::{SessionState, UploadSlot};
use crate::services::analysis_client::{AnalysisClient, HttpAnalysisClient};
use crate::services::board::AnalysisBoard;
use crate::services::frame_service;
use crate::services::media_service;
use crate::services::view_model::ViewState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub path: PathBuf,
    /// Upload card to use; picked from the MIME type when absent.
    pub slot: Option<UploadSlot>,
    pub frames_dir: Option<PathBuf>,
}

pub async fn analyze_file(config: &Config, request: AnalyzeRequest) -> Result<AnalysisResult, AppError> {
    let client = HttpAnalysisClient::new(config.endpoint.clone(), config.request_timeout)?;
    info!("Analysis endpoint: {}", client.endpoint());
    run_analysis(Arc::new(client), config, request).await
}

/// Drive one slot of a fresh board until its attempt settles.
pub async fn run_analysis(
    client: Arc<dyn AnalysisClient>,
    config: &Config,
    request: AnalyzeRequest,
) -> Result<AnalysisResult, AppError> {
    let file = media_service::load_selected_file(&request.path).await?;
    let slot = request
        .slot
        .unwrap_or_else(|| media_service::slot_for_mime(&file.mime));
    if !slot.accepts(&file.mime) {
        warn!(
            "{} ({}) does not match the {:?} slot filter {}",
            file.name,
            file.mime,
            slot,
            slot.accept()
        );
    }

    let board = AnalysisBoard::new(client, config.session_timing());
    let session = board.session(slot);
    let mut updates = session.subscribe();
    let mut view = board.subscribe();

    if !session.select_file(file) {
        return Err("Another analysis is already running for this slot".into());
    }

    let mut last_progress = None;
    let outcome = loop {
        let state = updates.borrow_and_update().state.clone();
        if state.is_terminal() {
            break state;
        }
        if let SessionState::Analyzing { progress, stage } = &state {
            if last_progress != Some(*progress) {
                info!("{:>3}% {}", progress, stage);
                last_progress = Some(*progress);
            }
        }
        if updates.changed().await.is_err() {
            return Err("Upload session closed unexpectedly".into());
        }
    };

    if let SessionState::Failed { message } = outcome {
        return Err(message.into());
    }

    let view_state = view
        .wait_for(|v| matches!(v, ViewState::Complete { .. }))
        .await
        .map_err(|_| AppError::from("Analysis view closed unexpectedly"))?
        .clone();
    let result = match view_state {
        ViewState::Complete { result } => result,
        ViewState::Idle => return Err("Analysis finished without a result".into()),
    };

    if let Some(dir) = &request.frames_dir {
        let written = frame_service::export_frames(&result, dir).await?;
        info!("Exported {} suspicious frame(s) to {}", written.len(), dir.display());
    }

    Ok(result)
}
