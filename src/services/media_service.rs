use crate::error::AppError;
use crate::models::upload_types::{SelectedFile, UploadSlot};
use std::path::Path;

const AUDIO_EXTENSIONS: &[(&str, &str)] = &[
    ("wav", "audio/wav"),
    ("mp3", "audio/mpeg"),
    ("flac", "audio/flac"),
    ("ogg", "audio/ogg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
];

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
];

const VIDEO_EXTENSIONS: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
];

pub const FALLBACK_MIME: &str = "application/octet-stream";

pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return FALLBACK_MIME,
    };
    AUDIO_EXTENSIONS
        .iter()
        .chain(IMAGE_EXTENSIONS)
        .chain(VIDEO_EXTENSIONS)
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME)
}

/// The slot a picker would have offered for this MIME type.
pub fn slot_for_mime(mime: &str) -> UploadSlot {
    [UploadSlot::Audio, UploadSlot::Image, UploadSlot::Video]
        .into_iter()
        .find(|slot| slot.accepts(mime))
        .unwrap_or(UploadSlot::Unknown)
}

/// Read a file from disk the way a picker would hand it over.
pub async fn load_selected_file(path: &Path) -> Result<SelectedFile, AppError> {
    if !path.is_file() {
        return Err(format!("Not a file: {}", path.display()).into());
    }

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let bytes = tokio::fs::read(path).await.map_err(|e| AppError {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    Ok(SelectedFile::new(name, mime_for_path(path), bytes))
}
