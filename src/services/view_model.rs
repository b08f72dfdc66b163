use crate::models::analysis_types::AnalysisResult;
use serde::Serialize;

/// Page-level state. Intermediate progress lives in the upload sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Idle,
    Complete { result: AnalysisResult },
}

#[derive(Debug, Default)]
pub struct AnalysisViewModel {
    state: ViewState,
}

impl AnalysisViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            ViewState::Complete { result } => Some(result),
            ViewState::Idle => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.result().is_some()
    }

    /// A second completion replaces the held result.
    pub fn complete_analysis(&mut self, result: AnalysisResult) {
        self.state = ViewState::Complete { result };
    }

    pub fn reset(&mut self) {
        self.state = ViewState::Idle;
    }

    pub fn headline(&self) -> Option<&'static str> {
        self.result().map(headline)
    }

    pub fn verdict_badge(&self) -> Option<String> {
        self.result().map(verdict_badge)
    }
}

pub fn headline(result: &AnalysisResult) -> &'static str {
    if result.is_deepfake {
        "Deepfake Detected"
    } else {
        "Authentic Content"
    }
}

pub fn verdict_badge(result: &AnalysisResult) -> String {
    format!(
        "{}% {}",
        result.probability,
        if result.is_deepfake { "Fake" } else { "Real" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis_types::Label;
    use crate::services::transformer::transform;
    use crate::services::upload_session::tests::raw;

    #[test]
    fn starts_idle() {
        let vm = AnalysisViewModel::new();
        assert_eq!(vm.state(), &ViewState::Idle);
        assert!(vm.headline().is_none());
    }

    #[test]
    fn completion_holds_result() {
        let mut vm = AnalysisViewModel::new();
        vm.complete_analysis(transform(&raw(Label::Fake, "a.mp4", "video", 92.0)));

        assert!(vm.is_complete());
        assert_eq!(vm.result().unwrap().file_name, "a.mp4");
        assert_eq!(vm.headline(), Some("Deepfake Detected"));
        assert_eq!(vm.verdict_badge().as_deref(), Some("92% Fake"));
    }

    #[test]
    fn reset_always_returns_to_idle() {
        let mut vm = AnalysisViewModel::new();
        vm.reset();
        assert_eq!(vm.state(), &ViewState::Idle);

        vm.complete_analysis(transform(&raw(Label::Real, "b.wav", "audio", 55.0)));
        vm.reset();
        assert_eq!(vm.state(), &ViewState::Idle);
        assert!(vm.result().is_none());
    }

    #[test]
    fn later_completion_replaces_result() {
        let mut vm = AnalysisViewModel::new();
        vm.complete_analysis(transform(&raw(Label::Real, "b.wav", "audio", 55.0)));
        vm.complete_analysis(transform(&raw(Label::Fake, "c.png", "image", 88.0)));
        assert_eq!(vm.result().unwrap().file_name, "c.png");
        assert_eq!(vm.headline(), Some("Deepfake Detected"));
    }
}
