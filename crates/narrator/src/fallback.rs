//! Template profile used without generated text

use crate::NarratorConfig;
use ghprofile_analyzer::{ComprehensiveSummary, TrendSummary};

/// Deterministic README used when the generative service is unavailable
pub fn fallback_readme(
    summary: &ComprehensiveSummary,
    trends: &TrendSummary,
    config: &NarratorConfig,
) -> String {
    let name = summary
        .user
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&config.username);

    let technologies = if trends.expertise_areas.is_empty() {
        "Exploring various technologies".to_string()
    } else {
        join_display(&trends.expertise_areas)
    };

    format!(
        "# {name}

## About Me

I'm a developer with {starred} starred repositories and {own} personal projects.

## Recent Activity

- {commits} commits in the last {days} days
- {prs_created} pull requests created
- {prs_reviewed} pull requests reviewed

## Technologies

{technologies}

## GitHub Trophies

![GitHub Trophies]({trophy})
",
        name = name,
        starred = summary.starred.len(),
        own = summary.own_repos.len(),
        commits = summary.activity.commits,
        days = config.recent_days,
        prs_created = summary.activity.prs_created,
        prs_reviewed = summary.activity.prs_reviewed,
        technologies = technologies,
        trophy = trophy_url(&config.username),
    )
}

pub(crate) fn trophy_url(username: &str) -> String {
    format!(
        "https://github-profile-trophy.vercel.app/?username={}&theme=onedark&no-frame=true&no-bg=true&column=7",
        username
    )
}

pub(crate) fn join_display<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ghprofile_analyzer::{summarize, AnalysisConfig, Category};
    use ghprofile_models::UserProfile;

    fn inputs() -> (ComprehensiveSummary, TrendSummary) {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        summarize(&[], &[], &[], now, &AnalysisConfig::default())
    }

    #[test]
    fn uses_username_without_profile_name() {
        let (summary, trends) = inputs();
        let text = fallback_readme(&summary, &trends, &NarratorConfig::new("octocat"));

        assert!(text.starts_with("# octocat\n"));
        assert!(text.contains("0 starred repositories and 0 personal projects"));
        assert!(text.contains("- 0 commits in the last 30 days"));
        assert!(text.contains("Exploring various technologies"));
        assert!(text.contains("username=octocat&theme=onedark"));
    }

    #[test]
    fn lists_expertise_areas_and_profile_name() {
        let (summary, mut trends) = inputs();
        let summary = summary.with_user(UserProfile {
            login: "octocat".to_string(),
            name: Some("Mona Lisa".to_string()),
            ..Default::default()
        });
        trends.expertise_areas = vec![Category::Devops, Category::Cloud];

        let text = fallback_readme(&summary, &trends, &NarratorConfig::new("octocat"));
        assert!(text.starts_with("# Mona Lisa\n"));
        assert!(text.contains("\ndevops, cloud\n"));
    }

    #[test]
    fn is_deterministic() {
        let (summary, trends) = inputs();
        let config = NarratorConfig::new("octocat");
        assert_eq!(
            fallback_readme(&summary, &trends, &config),
            fallback_readme(&summary, &trends, &config)
        );
    }
}
