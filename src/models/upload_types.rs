use crate::models::analysis_types::AnalysisResult;
use serde::{Deserialize, Serialize};

/// One upload card on the page. Each slot owns an independent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UploadSlot {
    Audio,
    Image,
    Video,
    /// Auto-detect: accepts any media kind.
    Unknown,
}

impl UploadSlot {
    pub const ALL: [UploadSlot; 4] = [
        UploadSlot::Audio,
        UploadSlot::Image,
        UploadSlot::Video,
        UploadSlot::Unknown,
    ];

    /// Accept filter handed to the file picker.
    pub fn accept(&self) -> &'static str {
        match self {
            UploadSlot::Audio => "audio/*",
            UploadSlot::Image => "image/*",
            UploadSlot::Video => "video/*",
            UploadSlot::Unknown => "audio/*,image/*,video/*",
        }
    }

    pub fn accepts(&self, mime: &str) -> bool {
        let top_level = mime.split('/').next().unwrap_or_default();
        self.accept()
            .split(',')
            .any(|pattern| match pattern.strip_suffix("/*") {
                Some(prefix) => prefix.eq_ignore_ascii_case(top_level),
                None => pattern.eq_ignore_ascii_case(mime),
            })
    }
}

/// A file handed over by the picker or a drop event. The bytes are never
/// inspected on this side.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Dragging,
    Analyzing { progress: u8, stage: String },
    Complete { result: AnalysisResult },
    Failed { message: String },
}

impl SessionState {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, SessionState::Analyzing { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Complete { .. } | SessionState::Failed { .. })
    }
}

/// One `(percentage, stage)` step of the cosmetic progress display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    pub progress: u8,
    pub stage: String,
}

impl ProgressUpdate {
    pub fn new(progress: u8, stage: impl Into<String>) -> Self {
        Self {
            progress,
            stage: stage.into(),
        }
    }

    pub fn idle() -> Self {
        Self::new(0, "")
    }
}

/// Everything a front end needs to draw one upload slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub slot: UploadSlot,
    pub state: SessionState,
    pub file_name: Option<String>,
    pub progress: u8,
    pub stage: String,
}

impl SessionSnapshot {
    pub fn idle(slot: UploadSlot) -> Self {
        Self {
            slot,
            state: SessionState::Idle,
            file_name: None,
            progress: 0,
            stage: String::new(),
        }
    }
}
