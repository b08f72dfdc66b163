use crate::error::AnalysisError;
use crate::models::analysis_types::RawServiceResponse;
use crate::models::upload_types::SelectedFile;
use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, warn};

/// Name of the multipart field the service reads the upload from.
pub const FILE_FIELD: &str = "file";

/// The remote classifier, as seen from an upload session.
pub trait AnalysisClient: Send + Sync {
    fn analyze(&self, file: SelectedFile) -> BoxFuture<'_, Result<RawServiceResponse, AnalysisError>>;
}

#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, file: SelectedFile) -> Result<RawServiceResponse, AnalysisError> {
        let size = file.bytes.len();
        let name = file.name.clone();
        // mime_str consumes the part on failure, so probe with an empty one first
        let mime_usable = Part::bytes(Vec::new()).mime_str(&file.mime).is_ok();
        let mut part = Part::bytes(file.bytes).file_name(file.name);
        if mime_usable {
            part = part
                .mime_str(&file.mime)
                .map_err(|e| AnalysisError::Transport(e.to_string()))?;
        } else {
            warn!("Sending {} without a content type, unusable MIME {:?}", name, file.mime);
        }
        let form = Form::new().part(FILE_FIELD, part);

        debug!("POST {} file={} bytes={}", self.endpoint, name, size);
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Service {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown status").to_string(),
                detail: error_detail(&body),
            });
        }

        let body = response.bytes().await?;
        decode_response(&body)
    }
}

impl AnalysisClient for HttpAnalysisClient {
    fn analyze(&self, file: SelectedFile) -> BoxFuture<'_, Result<RawServiceResponse, AnalysisError>> {
        Box::pin(self.post(file))
    }
}

/// Parse and range-check a success body.
pub fn decode_response(body: &[u8]) -> Result<RawServiceResponse, AnalysisError> {
    let raw: RawServiceResponse = serde_json::from_slice(body)?;
    raw.validate()?;
    Ok(raw)
}

/// The service reports rejections as `{"detail": ...}`; validation errors
/// carry a list there instead of a string.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
