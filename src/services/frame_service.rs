use crate::error::AppError;
use crate::models::analysis_types::AnalysisResult;
use base64::Engine;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A suspicious frame decoded from its `data:<mime>;base64,<payload>` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DecodedFrame {
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

/// Markers are opaque; only base64 data URIs can be turned into bytes.
pub fn decode_frame(marker: &serde_json::Value) -> Option<DecodedFrame> {
    let uri = marker.as_str()?;
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()?;
    Some(DecodedFrame {
        mime: if mime.is_empty() { "image/jpeg".to_string() } else { mime.to_string() },
        bytes,
    })
}

/// Write every decodable suspicious frame into `dir` as `frame_<n>.<ext>`.
pub async fn export_frames(result: &AnalysisResult, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| AppError {
        message: format!("Failed to create directory {}: {}", dir.display(), e),
    })?;

    let mut written = Vec::new();
    for (idx, marker) in result.suspicious_frames.iter().enumerate() {
        let frame = match decode_frame(marker) {
            Some(f) => f,
            None => {
                warn!("Skipping suspicious frame {}: not a base64 data URI", idx);
                continue;
            }
        };
        let path = dir.join(format!("frame_{:03}.{}", idx, frame.extension()));
        tokio::fs::write(&path, &frame.bytes).await.map_err(|e| AppError {
            message: format!("Failed to write {}: {}", path.display(), e),
        })?;
        debug!("Wrote {} ({} bytes)", path.display(), frame.bytes.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis_types::Label;
    use crate::services::transformer::transform;
    use crate::services::upload_session::tests::raw;
    use serde_json::json;

    #[test]
    fn decodes_jpeg_data_uri() {
        let frame = decode_frame(&json!("data:image/jpeg;base64,/9j/4A==")).unwrap();
        assert_eq!(frame.mime, "image/jpeg");
        assert_eq!(frame.bytes, vec![0xff, 0xd8, 0xff, 0xe0]);
        assert_eq!(frame.extension(), "jpg");
    }

    #[test]
    fn opaque_markers_are_not_decoded() {
        assert!(decode_frame(&json!(17)).is_none());
        assert!(decode_frame(&json!("frame-17")).is_none());
        assert!(decode_frame(&json!("data:image/png,rawpixels")).is_none());
        assert!(decode_frame(&json!("data:image/png;base64,***")).is_none());
    }

    #[tokio::test]
    async fn exports_only_decodable_frames() {
        let mut input = raw(Label::Fake, "v.mp4", "video", 91.0);
        input.suspicious_frames = vec![
            json!("data:image/jpeg;base64,/9j/4A=="),
            json!({"frame": 3}),
            json!("data:image/png;base64,iVBORw=="),
        ];
        let result = transform(&input);

        let dir = tempfile::tempdir().unwrap();
        let written = export_frames(&result, dir.path()).await.unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("frame_000.jpg"));
        assert!(written[1].ends_with("frame_002.png"));
        assert_eq!(std::fs::read(&written[0]).unwrap(), vec![0xff, 0xd8, 0xff, 0xe0]);
    }
}
