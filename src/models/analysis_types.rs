use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Whole-file verdict as the service spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fake => "FAKE",
            Label::Real => "REAL",
        }
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, Label::Fake)
    }
}

/// Body of a successful `POST /analyze`. Only lives while it is being
/// transformed into an [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawServiceResponse {
    pub label: Label,
    pub filename: String,
    pub file_type: String,
    pub confidence: f64,
    /// Video responses carry no probability of their own.
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub suspicious_frames: Vec<serde_json::Value>,
    #[serde(default)]
    pub authentic_probability: Option<f64>,
    #[serde(default)]
    pub total_frames_analyzed: Option<u32>,
    #[serde(default)]
    pub suspicious_frame_count: Option<u32>,
}

impl RawServiceResponse {
    pub fn probability_or_confidence(&self) -> f64 {
        self.probability.unwrap_or(self.confidence)
    }

    /// Range checks on the numbers the viewer relies on. The label is
    /// already constrained by deserialization.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        check_percentage("confidence", self.confidence)?;
        if let Some(p) = self.probability {
            check_percentage("probability", p)?;
        }
        if let Some(p) = self.authentic_probability {
            check_percentage("authentic_probability", p)?;
        }
        Ok(())
    }
}

fn check_percentage(field: &str, value: f64) -> Result<(), AnalysisError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(AnalysisError::MalformedResponse(format!(
            "{} out of range 0-100: {}",
            field, value
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailStatus {
    Authentic,
    Fake,
    Warning,
    Info,
}

impl DetailStatus {
    pub fn from_verdict(is_deepfake: bool) -> Self {
        if is_deepfake {
            DetailStatus::Fake
        } else {
            DetailStatus::Authentic
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub label: String,
    pub value: String,
    pub status: DetailStatus,
}

/// A contiguous percentage range of the analyzed timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub is_fake: bool,
    pub confidence: f64,
    pub probability: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub file_name: String,
    pub file_type: String,
    pub is_deepfake: bool,
    pub confidence: f64,
    pub probability: f64,
    pub overall_score: f64,
    pub segments: Vec<Segment>,
    pub details: Vec<Detail>,
    pub suspicious_frames: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_analyzed: Option<u32>,
}

impl AnalysisResult {
    pub fn detail(&self, label: &str) -> Option<&Detail> {
        self.details.iter().find(|d| d.label == label)
    }

    /// True when the segments, taken in order, cover 0..100 with no gap and
    /// no overlap.
    pub fn timeline_is_partitioned(&self) -> bool {
        let mut cursor = 0.0;
        for segment in &self.segments {
            if segment.start != cursor || segment.end <= segment.start {
                return false;
            }
            cursor = segment.end;
        }
        !self.segments.is_empty() && cursor == 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_image_response() {
        let raw: RawServiceResponse = serde_json::from_str(
            r#"{"label":"FAKE","confidence":81.5,"authentic_probability":18.5,
                "probability":81.5,"suspicious_frames":[],"file_type":"image","filename":"x.png"}"#,
        )
        .unwrap();
        assert_eq!(raw.label, Label::Fake);
        assert_eq!(raw.probability, Some(81.5));
        assert_eq!(raw.authentic_probability, Some(18.5));
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn video_response_without_probability_falls_back_to_confidence() {
        let raw: RawServiceResponse = serde_json::from_str(
            r#"{"label":"REAL","confidence":12.0,"file_type":"video","filename":"v.mp4",
                "total_frames_analyzed":31,"suspicious_frame_count":0}"#,
        )
        .unwrap();
        assert!(raw.suspicious_frames.is_empty());
        assert_eq!(raw.probability_or_confidence(), 12.0);
        assert_eq!(raw.total_frames_analyzed, Some(31));
    }

    #[test]
    fn unknown_label_is_rejected() {
        let res = serde_json::from_str::<RawServiceResponse>(
            r#"{"label":"MAYBE","confidence":50,"probability":0.5,"file_type":"audio","filename":"a.wav"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn out_of_range_confidence_fails_validation() {
        let raw: RawServiceResponse = serde_json::from_str(
            r#"{"label":"REAL","confidence":140,"probability":0.4,"file_type":"audio","filename":"a.wav"}"#,
        )
        .unwrap();
        match raw.validate() {
            Err(AnalysisError::MalformedResponse(msg)) => assert!(msg.contains("confidence")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn negative_probability_fails_validation() {
        let raw: RawServiceResponse = serde_json::from_str(
            r#"{"label":"REAL","confidence":40,"probability":-1,"file_type":"audio","filename":"a.wav"}"#,
        )
        .unwrap();
        assert!(raw.validate().is_err());
    }

    #[test]
    fn result_serializes_with_camel_case_keys() {
        let result = AnalysisResult {
            file_name: "a.mp4".into(),
            file_type: "video".into(),
            is_deepfake: true,
            confidence: 92.0,
            probability: 0.92,
            overall_score: 92.0,
            segments: vec![],
            details: vec![Detail {
                label: "File Type".into(),
                value: "VIDEO".into(),
                status: DetailStatus::Info,
            }],
            suspicious_frames: vec![],
            frames_analyzed: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fileName"], "a.mp4");
        assert_eq!(json["isDeepfake"], true);
        assert_eq!(json["overallScore"], 92.0);
        assert_eq!(json["details"][0]["status"], "info");
        assert!(json.get("framesAnalyzed").is_none());
    }
}
