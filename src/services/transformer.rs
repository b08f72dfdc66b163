use crate::models::analysis_types::{
    AnalysisResult, Detail, DetailStatus, RawServiceResponse, Segment,
};

pub const ANALYSIS_MODEL: &str = "ViT (Vision Transformer)";

/// At or below this confidence the score row is shown as a warning,
/// whatever the verdict.
pub const CONFIDENCE_WARNING_THRESHOLD: f64 = 70.0;

/// Normalize a service response into the shape the viewer draws.
///
/// Numbers are passed through untouched; range checks belong to the
/// response boundary (`RawServiceResponse::validate`).
pub fn transform(raw: &RawServiceResponse) -> AnalysisResult {
    let is_deepfake = raw.label.is_fake();
    let probability = raw.probability_or_confidence();

    let segments = vec![Segment {
        start: 0.0,
        end: 100.0,
        is_fake: is_deepfake,
        confidence: raw.confidence,
        probability,
        reason: if is_deepfake {
            "AI manipulation detected".to_string()
        } else {
            "No manipulation detected".to_string()
        },
    }];

    AnalysisResult {
        file_name: raw.filename.clone(),
        file_type: raw.file_type.clone(),
        is_deepfake,
        confidence: raw.confidence,
        probability,
        overall_score: raw.confidence,
        segments,
        details: build_details(raw, is_deepfake),
        suspicious_frames: raw.suspicious_frames.clone(),
        frames_analyzed: raw.total_frames_analyzed,
    }
}

fn build_details(raw: &RawServiceResponse, is_deepfake: bool) -> Vec<Detail> {
    vec![
        Detail {
            label: "Detection Status".to_string(),
            value: raw.label.as_str().to_string(),
            status: DetailStatus::from_verdict(is_deepfake),
        },
        Detail {
            label: "Confidence Score".to_string(),
            value: format!("{}%", raw.confidence),
            status: confidence_status(raw.confidence, is_deepfake),
        },
        Detail {
            label: "File Type".to_string(),
            value: raw.file_type.to_uppercase(),
            status: DetailStatus::Info,
        },
        Detail {
            label: "Analysis Model".to_string(),
            value: ANALYSIS_MODEL.to_string(),
            status: DetailStatus::Info,
        },
    ]
}

pub fn confidence_status(confidence: f64, is_deepfake: bool) -> DetailStatus {
    if confidence > CONFIDENCE_WARNING_THRESHOLD {
        DetailStatus::from_verdict(is_deepfake)
    } else {
        DetailStatus::Warning
    }
}
