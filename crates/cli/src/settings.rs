//! Command-line and environment settings

use clap::Args;
use ghprofile_analyzer::AnalysisConfig;
use ghprofile_collector::{CollectorConfig, RetryPolicy};
use ghprofile_narrator::{ContactInfo, NarratorConfig, PublisherConfig};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

const GITHUB_USERNAME_MAX_LEN: usize = 39;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+(?:-[a-zA-Z0-9]+)*$").expect("username pattern is valid")
});

/// Settings shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// GitHub user to profile
    #[arg(
        short,
        long,
        env = "GITHUB_USERNAME",
        default_value = "",
        hide_default_value = true,
        global = true
    )]
    pub username: String,

    /// GitHub token (raises API rate limits)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub github_token: Option<String>,

    /// Gemini API key; without it a template profile is written
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.5-flash", global = true)]
    pub gemini_model: String,

    #[arg(
        long,
        env = "GEMINI_API_BASE",
        default_value = "https://generativelanguage.googleapis.com",
        global = true
    )]
    pub gemini_api_base: String,

    #[arg(long, env = "GITHUB_API_BASE", default_value = "https://api.github.com", global = true)]
    pub github_api_base: String,

    /// RSS feed of the user's blog
    #[arg(long, env = "BLOG_RSS_URL", global = true)]
    pub blog_rss_url: Option<String>,

    /// YAML or JSON skills document
    #[arg(long, env = "SKILLS_URL", global = true)]
    pub skills_url: Option<String>,

    /// Days counted as "recent"
    #[arg(long, env = "RECENT_DAYS", default_value_t = 30, global = true)]
    pub recent_days: u32,

    /// Days counted as "very recent"
    #[arg(long, env = "VERY_RECENT_DAYS", default_value_t = 90, global = true)]
    pub very_recent_days: u32,

    #[arg(long, env = "MAX_RECENT_COMMITS", default_value_t = 10, global = true)]
    pub max_recent_commits: usize,

    #[arg(long, env = "MAX_ACTIVE_REPOS", default_value_t = 5, global = true)]
    pub max_active_repos: usize,

    #[arg(long, env = "MAX_RECENT_STARS", default_value_t = 12, global = true)]
    pub max_recent_stars: usize,

    /// Area of expertise the profile must mention (repeatable)
    #[arg(
        long = "expertise-area",
        env = "EXPERTISE_AREAS",
        value_delimiter = ',',
        global = true
    )]
    pub expertise_areas: Vec<String>,

    #[arg(long, env = "EMAIL", global = true)]
    pub email: Option<String>,

    #[arg(long, env = "LINKEDIN", global = true)]
    pub linkedin: Option<String>,

    #[arg(long, env = "TWITTER", global = true)]
    pub twitter: Option<String>,

    #[arg(long, env = "WEBSITE", global = true)]
    pub website: Option<String>,

    /// Directory the READMEs are written to
    #[arg(short, long, env = "OUTPUT_DIR", default_value = ".", global = true)]
    pub output_dir: PathBuf,

    #[arg(long, env = "README_FILENAME", default_value = "README.md", global = true)]
    pub readme_filename: String,
}

impl Settings {
    pub fn user_agent(&self) -> String {
        format!("ghprofile/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            github_token: self.github_token.clone().filter(|t| !t.is_empty()),
            api_base: self.github_api_base.trim_end_matches('/').to_string(),
            user_agent: self.user_agent(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            max_pages: 50,
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            recent_days: self.recent_days,
            very_recent_days: self.very_recent_days,
            max_recent_commits: self.max_recent_commits,
        }
    }

    pub fn narrator_config(&self) -> NarratorConfig {
        let mut config = NarratorConfig::new(self.username.clone());
        config.recent_days = self.recent_days;
        config.very_recent_days = self.very_recent_days;
        config.max_recent_commits = self.max_recent_commits;
        config.max_active_repos = self.max_active_repos;
        config.max_recent_stars = self.max_recent_stars;
        config.expertise_areas = self
            .expertise_areas
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        config.contact = ContactInfo {
            email: self.email.clone(),
            linkedin: self.linkedin.clone(),
            twitter: self.twitter.clone(),
            website: self.website.clone(),
        };
        config
    }

    pub fn publisher_config(&self, narrator: &NarratorConfig) -> PublisherConfig {
        PublisherConfig {
            output_dir: self.output_dir.clone(),
            readme_filename: self.readme_filename.clone(),
            primary_locale: narrator.primary_locale.clone(),
            secondary_locale: narrator.secondary_locale.clone(),
        }
    }
}

/// Whether `username` is a syntactically valid GitHub login
pub fn is_valid_username(username: &str) -> bool {
    username.len() <= GITHUB_USERNAME_MAX_LEN && USERNAME_RE.is_match(username)
}
