use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::workflow::filter::FilterCriteria;

pub const MISSING_INPUT: &str = "API Key, Subsystem, and Output Directory must be filled.";

/// The inputs of one run as collected by the shell.
#[derive(Clone)]
pub struct RunRequest {
    pub token: String,
    pub subsystem: String,
    /// Comma-separated description keywords; may be empty.
    pub keywords: String,
    pub output_dir: PathBuf,
    pub group_id: u64,
}

// Manual Debug impl to avoid leaking the access token
impl std::fmt::Debug for RunRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunRequest")
            .field("token", &"[REDACTED]")
            .field("subsystem", &self.subsystem)
            .field("keywords", &self.keywords)
            .field("output_dir", &self.output_dir)
            .field("group_id", &self.group_id)
            .finish()
    }
}

impl RunRequest {
    /// Check the required inputs and build the filter criteria, using the
    /// configured spelling of the subsystem name.
    pub fn validate(&self, config: &AppConfig) -> Result<FilterCriteria> {
        if self.token.trim().is_empty()
            || self.subsystem.trim().is_empty()
            || self.output_dir.as_os_str().is_empty()
        {
            return Err(AppError::Validation(MISSING_INPUT.to_string()));
        }

        let subsystem = config.find_subsystem(&self.subsystem).ok_or_else(|| {
            AppError::Validation(format!(
                "Unknown subsystem '{}'. Expected one of: {}",
                self.subsystem.trim(),
                config.subsystems.join(", ")
            ))
        })?;

        Ok(FilterCriteria::parse(subsystem, &self.keywords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RunRequest {
        RunRequest {
            token: "glpat-abc".to_string(),
            subsystem: "pump cart".to_string(),
            keywords: "seal, hose".to_string(),
            output_dir: PathBuf::from("/tmp/reports"),
            group_id: 725,
        }
    }

    #[test]
    fn test_validate_builds_canonical_criteria() {
        let criteria = request().validate(&AppConfig::default()).unwrap();
        assert_eq!(criteria.subsystem(), "Pump Cart");
        assert_eq!(criteria.keywords(), ["seal", "hose"]);
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let config = AppConfig::default();
        for req in [
            RunRequest { token: " ".to_string(), ..request() },
            RunRequest { subsystem: String::new(), ..request() },
            RunRequest { output_dir: PathBuf::new(), ..request() },
        ] {
            let err = req.validate(&config).unwrap_err();
            assert_eq!(err.to_string(), MISSING_INPUT);
        }
    }

    #[test]
    fn test_validate_rejects_unknown_subsystem() {
        let req = RunRequest {
            subsystem: "Hydraulics".to_string(),
            ..request()
        };
        let err = req.validate(&AppConfig::default()).unwrap_err().to_string();
        assert!(err.contains("Unknown subsystem 'Hydraulics'"));
        assert!(err.contains("Cold Tree"));
    }

    #[test]
    fn test_keywords_are_optional() {
        let req = RunRequest {
            keywords: String::new(),
            ..request()
        };
        assert!(req.validate(&AppConfig::default()).unwrap().keywords().is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        assert!(!format!("{:?}", request()).contains("glpat-abc"));
    }
}
