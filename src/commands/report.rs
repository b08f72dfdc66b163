use crate::models::analysis_types::{AnalysisResult, DetailStatus};
use crate::services::view_model::{headline, verdict_badge};
use std::fmt::Write;

const TIMELINE_WIDTH: usize = 50;

/// Plain-text rendition of the result view.
pub fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}  [{}]", headline(result), verdict_badge(result));
    let _ = writeln!(out, "File: {}", result.file_name);
    let _ = writeln!(out);

    let _ = writeln!(out, "Analysis Timeline");
    let _ = writeln!(out, "|{}|", timeline_bar(result, TIMELINE_WIDTH));
    let _ = writeln!(out, " 0%{:>w$}{:>w$}{:>w$}{:>w$}", "25%", "50%", "75%", "100%", w = 12);
    let _ = writeln!(out, " #: fake/manipulated  =: authentic");
    let _ = writeln!(out);

    let _ = writeln!(out, "Detailed Analysis");
    for detail in &result.details {
        let _ = writeln!(
            out,
            "  {:<11} {:<18} {}",
            format!("[{}]", status_tag(detail.status)),
            detail.label,
            detail.value
        );
    }

    if !result.suspicious_frames.is_empty() || result.frames_analyzed.is_some() {
        let _ = writeln!(out);
        match result.frames_analyzed {
            Some(total) => {
                let _ = writeln!(
                    out,
                    "Suspicious frames: {} of {} analyzed",
                    result.suspicious_frames.len(),
                    total
                );
            }
            None => {
                let _ = writeln!(out, "Suspicious frames: {}", result.suspicious_frames.len());
            }
        }
    }

    out
}

fn status_tag(status: DetailStatus) -> &'static str {
    match status {
        DetailStatus::Authentic => "authentic",
        DetailStatus::Fake => "fake",
        DetailStatus::Warning => "warning",
        DetailStatus::Info => "info",
    }
}

/// One character per `100 / width` percent, sampled at the cell center.
fn timeline_bar(result: &AnalysisResult, width: usize) -> String {
    (0..width)
        .map(|cell| {
            let at = (cell as f64 + 0.5) * 100.0 / width as f64;
            match result
                .segments
                .iter()
                .find(|s| s.start <= at && at < s.end)
            {
                Some(s) if s.is_fake => '#',
                Some(_) => '=',
                None => ' ',
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis_types::{Label, Segment};
    use crate::services::transformer::transform;
    use crate::services::upload_session::tests::raw;

    #[test]
    fn fake_report_lists_verdict_and_rows() {
        let report = render_report(&transform(&raw(Label::Fake, "a.mp4", "video", 92.0)));

        assert!(report.starts_with("Deepfake Detected  [92% Fake]"));
        assert!(report.contains("File: a.mp4"));
        assert!(report.contains(&format!("|{}|", "#".repeat(TIMELINE_WIDTH))));
        assert!(report.contains("[fake]      Confidence Score   92%"));
        assert!(report.contains("[info]      File Type          VIDEO"));
        assert!(!report.contains("Suspicious frames"));
    }

    #[test]
    fn low_confidence_authentic_report_shows_warning() {
        let report = render_report(&transform(&raw(Label::Real, "b.wav", "audio", 55.0)));
        assert!(report.starts_with("Authentic Content"));
        assert!(report.contains("[warning]   Confidence Score   55%"));
        assert!(report.contains(&"=".repeat(TIMELINE_WIDTH)));
    }

    #[test]
    fn timeline_draws_each_segment() {
        let mut result = transform(&raw(Label::Fake, "v.mp4", "video", 90.0));
        result.segments = vec![
            Segment {
                start: 0.0,
                end: 50.0,
                is_fake: false,
                confidence: 90.0,
                probability: 10.0,
                reason: "No manipulation detected".into(),
            },
            Segment {
                start: 50.0,
                end: 100.0,
                is_fake: true,
                confidence: 90.0,
                probability: 90.0,
                reason: "AI manipulation detected".into(),
            },
        ];
        assert!(result.timeline_is_partitioned());
        assert_eq!(timeline_bar(&result, 4), "==##");
    }

    #[test]
    fn frame_summary_for_video() {
        let mut input = raw(Label::Fake, "v.mp4", "video", 90.0);
        input.total_frames_analyzed = Some(31);
        input.suspicious_frames = vec![serde_json::json!("data:image/jpeg;base64,AA==")];
        let report = render_report(&transform(&input));
        assert!(report.contains("Suspicious frames: 1 of 31 analyzed"));
    }
}
