use std::path::PathBuf;

pub const SUCCESS_MESSAGE: &str = "Issues have been successfully grabbed and saved.";

/// What a finished grab produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrabSummary {
    pub path: PathBuf,
    pub total_issues: usize,
    pub matching_issues: usize,
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Report written.
    Succeeded(GrabSummary),
    /// Authentication, fetch or write failed.
    Failed { error: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded(_))
    }

    /// Message shown to the user when the run ends.
    pub fn message(&self) -> String {
        match self {
            RunOutcome::Succeeded(_) => SUCCESS_MESSAGE.to_string(),
            RunOutcome::Failed { error } => format!("An error occurred: {error}"),
        }
    }
}

/// Events streamed from a run to whoever started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Progress(String),
    Finished(RunOutcome),
}
