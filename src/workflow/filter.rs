use crate::platform::types::{Issue, IssueState};

/// Criteria deciding which issues belong in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    subsystem: String,
    keywords: Vec<String>,
}

impl FilterCriteria {
    pub fn new(subsystem: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            subsystem: subsystem.into(),
            keywords,
        }
    }

    /// Build criteria from raw input, splitting `keyword_input` on commas and
    /// trimming each entry. Only a fully empty input means "no keywords";
    /// blank entries are kept and match any non-empty description.
    pub fn parse(subsystem: &str, keyword_input: &str) -> Self {
        let keywords = if keyword_input.is_empty() {
            Vec::new()
        } else {
            keyword_input
                .split(',')
                .map(|k| k.trim().to_string())
                .collect()
        };
        Self::new(subsystem.trim(), keywords)
    }

    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True iff the issue is open, carries a label containing the subsystem
    /// term, and (when keywords are given) has a description containing at
    /// least one keyword. All comparisons ignore case except the state.
    pub fn matches(&self, issue: &Issue) -> bool {
        if issue.state != IssueState::Opened {
            return false;
        }

        let subsystem = self.subsystem.to_lowercase();
        if !issue
            .labels
            .iter()
            .any(|label| label.to_lowercase().contains(&subsystem))
        {
            return false;
        }

        if self.keywords.is_empty() {
            return true;
        }

        match issue.description_text() {
            Some(description) => {
                let description = description.to_lowercase();
                self.keywords
                    .iter()
                    .any(|k| description.contains(&k.to_lowercase()))
            }
            None => false,
        }
    }

    /// Report file name: `<subsystem>_<first keyword>.txt`, or
    /// `<subsystem>_all_issues.txt` without keywords. Spaces become underscores.
    pub fn output_file_name(&self) -> String {
        let subsystem = self.subsystem.replace(' ', "_");
        match self.keywords.first() {
            Some(keyword) => format!("{subsystem}_{}.txt", keyword.replace(' ', "_")),
            None => format!("{subsystem}_all_issues.txt"),
        }
    }

    /// Human-readable description used in the report header.
    pub fn describe(&self) -> String {
        let mut text = format!("Issues containing '{}' in labels", self.subsystem);
        if !self.keywords.is_empty() {
            text.push_str(&format!(" and '{}' in description", self.keywords.join(" or ")));
        }
        text
    }
}
