//! ghprofile Narrator
//!
//! Formats aggregated profile data into a prompt for a generative text
//! service, splits the answer into two localized documents and writes them.

mod fallback;
pub mod gemini;
mod prompt;
pub mod publisher;

pub use fallback::fallback_readme;
pub use gemini::GeminiClient;
pub use prompt::{build_prompt, LANG_SEPARATOR};
pub use publisher::{Publisher, PublisherConfig};

use ghprofile_analyzer::{ComprehensiveSummary, TrendSummary};
use ghprofile_models::{BlogPost, SkillCatalogue};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum NarratorError {
    #[error("Generative text service credential is not configured")]
    MissingCredential,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Generative text service returned no text")]
    EmptyResponse,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NarratorError>;

/// A language the README is produced in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// File suffix, e.g. `pt-br` for `README.pt-br.md`
    pub code: String,
    /// Human-readable name used in the prompt
    pub name: String,
}

impl Locale {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("README.{}.md", self.code)
    }
}

/// Contact links rendered at the end of the profile
#[derive(Debug, Clone, Default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

/// Settings for prompt formatting and the fallback document
#[derive(Debug, Clone)]
pub struct NarratorConfig {
    pub username: String,
    pub recent_days: u32,
    pub very_recent_days: u32,
    pub max_recent_commits: usize,
    pub max_active_repos: usize,
    pub max_recent_stars: usize,
    /// Areas the profile must always mention, in the order given
    pub expertise_areas: Vec<String>,
    pub contact: ContactInfo,
    pub primary_locale: Locale,
    pub secondary_locale: Locale,
}

impl NarratorConfig {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            recent_days: 30,
            very_recent_days: 90,
            max_recent_commits: 10,
            max_active_repos: 5,
            max_recent_stars: 12,
            expertise_areas: Vec::new(),
            contact: ContactInfo::default(),
            primary_locale: Locale::new("pt-br", "Portuguese (Brazil)"),
            secondary_locale: Locale::new("en", "English"),
        }
    }
}

/// The two localized README bodies
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDocuments {
    pub primary: String,
    pub secondary: String,
}

/// A service that turns a prompt into text
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Produces profile documents, falling back to a template on any failure
pub struct Narrator<G> {
    generator: Option<G>,
    config: NarratorConfig,
}

impl<G: TextGenerator> Narrator<G> {
    pub fn new(generator: Option<G>, config: NarratorConfig) -> Self {
        Self { generator, config }
    }

    /// Generate both documents; never fails
    pub async fn generate_profile(
        &self,
        summary: &ComprehensiveSummary,
        trends: &TrendSummary,
        blog_posts: &[BlogPost],
        skills: &SkillCatalogue,
    ) -> ProfileDocuments {
        let Some(ref generator) = self.generator else {
            warn!("GEMINI_API_KEY not configured, using fallback profile");
            return self.fallback(summary, trends);
        };

        let prompt = build_prompt(summary, trends, blog_posts, skills, &self.config);
        info!(chars = prompt.len(), "Requesting profile text");

        match generator.generate(&prompt).await {
            Ok(text) => split_documents(&text),
            Err(e) => {
                warn!(error = %e, "Text generation failed, using fallback profile");
                self.fallback(summary, trends)
            }
        }
    }

    fn fallback(&self, summary: &ComprehensiveSummary, trends: &TrendSummary) -> ProfileDocuments {
        let text = fallback_readme(summary, trends, &self.config);
        ProfileDocuments {
            primary: text.clone(),
            secondary: text,
        }
    }
}

/// Strip code fences and split generated text at [`LANG_SEPARATOR`]
///
/// Without a separator both documents get the whole text; with a separator but
/// no second part, the secondary document repeats the primary one.
pub fn split_documents(text: &str) -> ProfileDocuments {
    let cleaned = text.replace("```markdown", "").replace("```", "");
    let cleaned = cleaned.trim();

    let mut parts = cleaned.split(LANG_SEPARATOR).map(str::trim);
    let primary = parts.next().unwrap_or_default().to_string();
    let secondary = parts
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| primary.clone());

    ProfileDocuments { primary, secondary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghprofile_analyzer::{summarize, AnalysisConfig};
    use chrono::{TimeZone, Utc};

    struct FixedGenerator(&'static str);

    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(NarratorError::Api("quota exceeded".to_string()))
        }
    }

    fn inputs() -> (ComprehensiveSummary, TrendSummary) {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        summarize(&[], &[], &[], now, &AnalysisConfig::default())
    }

    #[test]
    fn splits_on_separator() {
        let text = format!("```markdown\n# Olá\n{}\n# Hello\n```", LANG_SEPARATOR);
        let docs = split_documents(&text);
        assert_eq!(docs.primary, "# Olá");
        assert_eq!(docs.secondary, "# Hello");
    }

    #[test]
    fn missing_separator_duplicates_text() {
        let docs = split_documents("# Only one\n");
        assert_eq!(docs.primary, "# Only one");
        assert_eq!(docs.secondary, "# Only one");
    }

    #[test]
    fn empty_second_part_repeats_first() {
        let docs = split_documents(&format!("# Olá\n{}\n", LANG_SEPARATOR));
        assert_eq!(docs.secondary, "# Olá");
    }

    #[tokio::test]
    async fn uses_generated_text() {
        let (summary, trends) = inputs();
        let text = "# PT\n---LANG_SEPARATOR---\n# EN";
        let narrator = Narrator::new(Some(FixedGenerator(text)), NarratorConfig::new("octocat"));

        let docs = narrator
            .generate_profile(&summary, &trends, &[], &SkillCatalogue::default())
            .await;
        assert_eq!(docs.primary, "# PT");
        assert_eq!(docs.secondary, "# EN");
    }

    #[tokio::test]
    async fn generator_failure_falls_back() {
        let (summary, trends) = inputs();
        let config = NarratorConfig::new("octocat");
        let expected = fallback_readme(&summary, &trends, &config);
        let narrator = Narrator::new(Some(FailingGenerator), config);

        let docs = narrator
            .generate_profile(&summary, &trends, &[], &SkillCatalogue::default())
            .await;
        assert_eq!(docs.primary, expected);
        assert_eq!(docs.secondary, expected);
    }

    #[tokio::test]
    async fn missing_generator_falls_back() {
        let (summary, trends) = inputs();
        let narrator: Narrator<FailingGenerator> = Narrator::new(None, NarratorConfig::new("octocat"));

        let docs = narrator
            .generate_profile(&summary, &trends, &[], &SkillCatalogue::default())
            .await;
        assert!(docs.primary.starts_with("# octocat"));
    }
}
