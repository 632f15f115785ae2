use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub gitlab: GitLabConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default = "default_subsystems")]
    pub subsystems: Vec<String>,
}

#[derive(Deserialize, Clone)]
pub struct GitLabConfig {
    #[serde(default = "default_gitlab_url")]
    pub url: String,
    /// Group whose issues are fetched.
    #[serde(default = "default_group_id")]
    pub group_id: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub token: Option<String>,
}

// Manual Debug impl to avoid leaking the access token
impl std::fmt::Debug for GitLabConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabConfig")
            .field("url", &self.url)
            .field("group_id", &self.group_id)
            .field("per_page", &self.per_page)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: default_gitlab_url(),
            group_id: default_group_id(),
            per_page: default_per_page(),
            token: None,
        }
    }
}

/// Metadata printed in the report header line.
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_tool_name")]
    pub tool_name: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_release_date")]
    pub release_date: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tool_name: default_tool_name(),
            author: default_author(),
            release_date: default_release_date(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProgressConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_ceiling")]
    pub ceiling: u8,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            ceiling: default_ceiling(),
        }
    }
}

fn default_gitlab_url() -> String {
    "https://gitlab.com".to_string()
}

fn default_group_id() -> u64 {
    725
}

fn default_per_page() -> u32 {
    100
}

fn default_tool_name() -> String {
    "Gitlab Data Grabber".to_string()
}

fn default_author() -> String {
    "Gerald Jackson".to_string()
}

fn default_release_date() -> String {
    "7/15/2024".to_string()
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_ceiling() -> u8 {
    95
}

fn default_subsystems() -> Vec<String> {
    [
        "Cold Tree",
        "Pump Cart",
        "Tail Set",
        "Controls",
        "Integration",
        "Electrical",
        "Assembly",
        "Magnetics",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gitlab: GitLabConfig::default(),
            report: ReportConfig::default(),
            progress: ProgressConfig::default(),
            subsystems: default_subsystems(),
        }
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(config::File::with_name("issue-grabber").required(false));
        }

        // Environment variable overrides with GRABBER_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("GRABBER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let config: AppConfig = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.gitlab.per_page == 0 {
            return Err(AppError::Config("gitlab.per_page must be at least 1".to_string()));
        }
        if self.progress.ceiling > 100 {
            return Err(AppError::Config(format!(
                "progress.ceiling must not exceed 100, got {}",
                self.progress.ceiling
            )));
        }
        if self.subsystems.is_empty() {
            return Err(AppError::Config("subsystems must not be empty".to_string()));
        }
        Ok(())
    }

    /// Case-insensitive lookup of a configured subsystem name.
    pub fn find_subsystem(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.subsystems
            .iter()
            .find(|s| s.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}
