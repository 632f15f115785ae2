pub mod task;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::platform::gitlab::GitLabPlatform;
use crate::platform::IssueTracker;
use crate::workflow;
use crate::workflow::filter::FilterCriteria;
use crate::workflow::types::{RunEvent, RunOutcome};

use task::RunRequest;

/// Starts grab runs in the background, one at a time.
pub struct Runner {
    config: Arc<AppConfig>,
    in_flight: Arc<AtomicBool>,
}

/// A started run: its event stream and the task driving it.
pub struct RunHandle {
    pub events: mpsc::UnboundedReceiver<RunEvent>,
    pub task: JoinHandle<()>,
}

/// Clears the in-flight flag when dropped, including on panic.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Runner {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate the request and start a run against the configured GitLab
    /// instance. Validation errors are returned here; anything failing after
    /// the run starts arrives as a `RunOutcome::Failed` event.
    pub fn start(&self, request: RunRequest) -> Result<RunHandle> {
        let criteria = request.validate(&self.config)?;
        let tracker = GitLabPlatform::new(&self.config.gitlab, &request.token)?;
        self.start_with(Arc::new(tracker), criteria, request.group_id, request.output_dir)
    }

    /// Start a run against an arbitrary tracker.
    pub fn start_with(
        &self,
        tracker: Arc<dyn IssueTracker>,
        criteria: FilterCriteria,
        group_id: u64,
        output_dir: PathBuf,
    ) -> Result<RunHandle> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::RunInProgress);
        }
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        let (tx, rx) = mpsc::unbounded_channel();
        let config = Arc::clone(&self.config);

        tracing::info!(
            subsystem = criteria.subsystem(),
            keywords = ?criteria.keywords(),
            group_id,
            "Starting run"
        );

        let task = tokio::spawn(async move {
            let result = workflow::grab::grab_issues(
                tracker.as_ref(),
                &criteria,
                group_id,
                &output_dir,
                &config.report,
                &tx,
            )
            .await;

            let outcome = match result {
                Ok(summary) => {
                    tracing::info!(
                        path = %summary.path.display(),
                        matches = summary.matching_issues,
                        "Run completed"
                    );
                    RunOutcome::Succeeded(summary)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Run failed");
                    RunOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };

            // Release before announcing so a listener may start the next run
            // as soon as it sees the outcome.
            drop(guard);
            let _ = tx.send(RunEvent::Finished(outcome));
        });

        Ok(RunHandle { events: rx, task })
    }
}

impl RunHandle {
    /// Forward progress lines to `on_progress` until the run finishes.
    pub async fn wait(mut self, mut on_progress: impl FnMut(&str)) -> RunOutcome {
        while let Some(event) = self.events.recv().await {
            match event {
                RunEvent::Progress(line) => on_progress(&line),
                RunEvent::Finished(outcome) => return outcome,
            }
        }

        // The sender only disappears without an outcome if the task panicked.
        let error = match self.task.await {
            Err(e) => format!("run task aborted: {e}"),
            Ok(()) => "run ended without an outcome".to_string(),
        };
        RunOutcome::Failed { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::types::IssueState;
    use crate::workflow::filter::tests::issue;
    use crate::workflow::grab::tests::FakeTracker;

    #[tokio::test]
    async fn test_run_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(AppConfig::default());
        let tracker = Arc::new(FakeTracker::with_issues(vec![issue(
            1,
            IssueState::Opened,
            &["Cold Tree"],
            None,
        )]));

        let handle = runner
            .start_with(tracker, FilterCriteria::parse("Cold Tree", ""), 725, dir.path().to_path_buf())
            .unwrap();
        let mut lines = Vec::new();
        let outcome = handle.wait(|l| lines.push(l.to_string())).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "Issues have been successfully grabbed and saved.");
        assert_eq!(lines.first().map(String::as_str), Some("Searching through 1 issues..."));
        assert!(dir.path().join("Cold_Tree_all_issues.txt").exists());
        assert!(!runner.is_running());
    }

    #[tokio::test]
    async fn test_auth_failure_is_one_message_and_runner_stays_usable() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(AppConfig::default());

        let handle = runner
            .start_with(
                Arc::new(FakeTracker::rejecting_token()),
                FilterCriteria::parse("Controls", ""),
                725,
                dir.path().to_path_buf(),
            )
            .unwrap();
        let mut lines = Vec::new();
        let outcome = handle.wait(|l| lines.push(l.to_string())).await;

        assert!(!outcome.is_success());
        let message = outcome.message();
        assert!(message.starts_with("An error occurred: "));
        assert!(message.contains("401 Unauthorized"));
        assert!(lines.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // A new run may be attempted afterwards.
        let handle = runner
            .start_with(
                Arc::new(FakeTracker::with_issues(Vec::new())),
                FilterCriteria::parse("Controls", ""),
                725,
                dir.path().to_path_buf(),
            )
            .unwrap();
        assert!(handle.wait(|_| {}).await.is_success());
    }

    #[tokio::test]
    async fn test_overlapping_run_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(AppConfig::default());
        // Simulate a run that has not finished yet.
        runner.in_flight.store(true, Ordering::Release);

        let result = runner.start_with(
            Arc::new(FakeTracker::with_issues(Vec::new())),
            FilterCriteria::parse("Controls", ""),
            725,
            dir.path().to_path_buf(),
        );
        assert!(matches!(result, Err(AppError::RunInProgress)));
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_request_without_running() {
        let runner = Runner::new(AppConfig::default());
        let request = RunRequest {
            token: String::new(),
            subsystem: "Controls".to_string(),
            keywords: String::new(),
            output_dir: PathBuf::from("/tmp"),
            group_id: 725,
        };

        let result = runner.start(request);
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(!runner.is_running());
    }
}
