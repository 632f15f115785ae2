use std::path::Path;

use tokio::sync::mpsc::UnboundedSender;

use crate::config::ReportConfig;
use crate::error::Result;
use crate::platform::types::Issue;
use crate::platform::IssueTracker;
use crate::workflow::filter::FilterCriteria;
use crate::workflow::report::{Report, NO_MATCHES};
use crate::workflow::types::{GrabSummary, RunEvent};

const PROGRESS_EVERY: usize = 20;

/// Send a progress line. A dropped receiver is not an error: the run
/// carries on and still writes its report.
fn emit(events: &UnboundedSender<RunEvent>, message: String) {
    tracing::debug!(message = %message, "Progress");
    let _ = events.send(RunEvent::Progress(message));
}

/// Fetch every issue of `group_id`, keep those matching `criteria`, and write
/// the report into `output_dir`.
pub async fn grab_issues(
    tracker: &dyn IssueTracker,
    criteria: &FilterCriteria,
    group_id: u64,
    output_dir: &Path,
    meta: &ReportConfig,
    events: &UnboundedSender<RunEvent>,
) -> Result<GrabSummary> {
    let user = tracker.authenticate().await?;
    tracing::info!(user = %user.username, "Authenticated to GitLab");

    let output_path = output_dir.join(criteria.output_file_name());

    let group = tracker.get_group(group_id).await?;
    let issues = tracker.list_group_issues(group_id).await?;
    let total = issues.len();
    tracing::info!(
        group_id,
        group = %group.full_path,
        issues = total,
        "Fetched group issues"
    );

    emit(events, format!("Searching through {total} issues..."));
    let matching = select_matching(issues, criteria, events);

    if matching.is_empty() {
        emit(events, NO_MATCHES.to_string());
    }

    let report = Report::new(meta, criteria, &group, &matching);
    report.write_to(&output_path).await?;
    tracing::info!(
        path = %output_path.display(),
        matches = report.len(),
        "Report written"
    );

    emit(
        events,
        format!("Matching issues have been written to {}", output_path.display()),
    );
    emit(events, format!("Total matching open issues: {}", matching.len()));

    Ok(GrabSummary {
        path: output_path,
        total_issues: total,
        matching_issues: matching.len(),
    })
}

/// Apply the predicate in fetch order, reporting each match and a progress
/// line every `PROGRESS_EVERY` issues and after the last one.
fn select_matching(
    issues: Vec<Issue>,
    criteria: &FilterCriteria,
    events: &UnboundedSender<RunEvent>,
) -> Vec<Issue> {
    let total = issues.len();
    let mut matching = Vec::new();

    for (index, issue) in issues.into_iter().enumerate() {
        let processed = index + 1;
        if criteria.matches(&issue) {
            emit(
                events,
                format!("Found matching issue: #{} - {}", issue.iid, issue.title),
            );
            matching.push(issue);
        }
        if processed % PROGRESS_EVERY == 0 || processed == total {
            emit(events, format!("Processed {processed}/{total} issues..."));
        }
    }

    matching
}
