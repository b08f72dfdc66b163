use crate::models::upload_types::ProgressUpdate;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const INITIAL_STAGE: &str = "Initializing";

/// One tick of the schedule; `at` is measured from the start signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStep {
    pub at: Duration,
    pub progress: u8,
    pub stage: &'static str,
}

pub const DEFAULT_SCHEDULE: [ProgressStep; 4] = [
    ProgressStep { at: Duration::from_millis(300), progress: 25, stage: "Uploading file" },
    ProgressStep { at: Duration::from_millis(600), progress: 50, stage: "Analyzing content" },
    ProgressStep { at: Duration::from_millis(900), progress: 75, stage: "Processing results" },
    ProgressStep { at: Duration::from_millis(1200), progress: 100, stage: "Complete" },
];

/// Cosmetic progress display. It never waits on, nor is waited on by, the
/// real request.
#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    steps: Vec<ProgressStep>,
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEDULE.to_vec())
    }
}

impl ProgressSimulator {
    pub fn new(mut steps: Vec<ProgressStep>) -> Self {
        steps.sort_by_key(|s| s.at);
        Self { steps }
    }

    pub fn steps(&self) -> &[ProgressStep] {
        &self.steps
    }

    pub fn initial() -> ProgressUpdate {
        ProgressUpdate::new(0, INITIAL_STAGE)
    }

    /// Spawn the schedule on the current runtime. Ticks keep firing until
    /// the schedule is exhausted or the handle is cancelled.
    pub fn start<F>(&self, on_tick: F) -> ProgressHandle
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        let steps = self.steps.clone();
        let started = Instant::now();
        let task = tokio::spawn(async move {
            for step in steps {
                tokio::time::sleep_until(started + step.at).await;
                on_tick(ProgressUpdate::new(step.progress, step.stage));
            }
        });
        ProgressHandle { task }
    }
}

/// Owner of the pending ticks. Dropping it leaves them running.
#[derive(Debug)]
pub struct ProgressHandle {
    task: JoinHandle<()>,
}

impl ProgressHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
