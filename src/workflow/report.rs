use std::fmt::{self, Write as _};
use std::path::Path;

use crate::config::ReportConfig;
use crate::error::Result;
use crate::platform::types::{Group, Issue};
use crate::workflow::filter::FilterCriteria;

pub const NO_MATCHES: &str = "No issues found matching the criteria";
const SEPARATOR_WIDTH: usize = 50;

/// The text report for one run.
pub struct Report<'a> {
    meta: &'a ReportConfig,
    criteria: &'a FilterCriteria,
    group: &'a Group,
    issues: &'a [Issue],
}

impl<'a> Report<'a> {
    pub fn new(
        meta: &'a ReportConfig,
        criteria: &'a FilterCriteria,
        group: &'a Group,
        issues: &'a [Issue],
    ) -> Self {
        Self {
            meta,
            criteria,
            group,
            issues,
        }
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Write the rendered report to `path`, replacing any existing file.
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.to_string()).await?;
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} - Written by: {} Date: {} V{}",
            self.meta.tool_name,
            self.meta.author,
            self.meta.release_date,
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{} for Group: {} (ID: {})",
            self.criteria.describe(),
            self.group.name,
            self.group.id
        )?;
        writeln!(f)?;
        writeln!(f, "Total Matching Issues: {}", self.issues.len())?;
        writeln!(f)?;

        if self.issues.is_empty() {
            return writeln!(f, "{NO_MATCHES}");
        }

        for issue in self.issues {
            f.write_str(&issue_block(issue))?;
        }
        Ok(())
    }
}

fn issue_block(issue: &Issue) -> String {
    let mut block = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(block, "Title: {}", issue.title);
    let _ = writeln!(block, "ID: {}", issue.iid);
    let _ = writeln!(block, "State: {}", issue.state);
    let _ = writeln!(block, "Created at: {}", issue.created_at);
    let _ = writeln!(block, "URL: {}", issue.web_url);
    let _ = writeln!(block, "Labels: {}", issue.labels.join(", "));
    let _ = writeln!(
        block,
        "Description: {}",
        issue.description_text().unwrap_or("No description available")
    );
    let _ = writeln!(block, "{}", "-".repeat(SEPARATOR_WIDTH));
    block
}
