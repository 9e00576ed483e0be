//! Comprehensive summary of starred and owned repositories

use crate::activity::ActivitySummary;
use crate::categories::{categorize, Category};
use crate::tally::Tally;
use crate::{days_before, AnalysisConfig};
use chrono::{DateTime, Utc};
use ghprofile_models::{RepositoryRecord, StarEvent, UserProfile};
use serde::Serialize;
use std::collections::BTreeMap;

/// Repositories untouched for longer than this are not considered maintained
const MAINTAINED_WINDOW_DAYS: i64 = 180;

/// A starred repository with its recency flags
#[derive(Debug, Clone, Serialize)]
pub struct StarredRepoSummary {
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub stars: u64,
    pub forks: u64,
    pub starred_at: DateTime<Utc>,
    pub is_recent: bool,
    pub is_very_recent: bool,
    pub categories: Vec<Category>,
}

/// An owned, non-fork repository with its activity flags
#[derive(Debug, Clone, Serialize)]
pub struct OwnRepoSummary {
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub stars: u64,
    pub forks: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_private: bool,
    pub has_issues: bool,
    pub open_issues: u64,
    pub categories: Vec<Category>,
    pub size_kb: u64,
    pub has_docs: bool,
    pub is_maintained: bool,
}

/// Everything derived from one aggregation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComprehensiveSummary {
    pub user: UserProfile,
    pub starred: Vec<StarredRepoSummary>,
    pub own_repos: Vec<OwnRepoSummary>,
    pub activity: ActivitySummary,
    pub all_topics: Tally,
    pub all_languages: Tally,
    pub recent_stars: Vec<StarredRepoSummary>,
    /// Star times per topic, starred repositories only
    pub topic_timeline: BTreeMap<String, Vec<DateTime<Utc>>>,
    /// Language counts over starred repositories only
    pub language_evolution: Tally,
    /// Category counts pooled across starred and owned repositories
    pub repo_categories: BTreeMap<Category, u64>,
}

impl ComprehensiveSummary {
    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = user;
        self
    }

    /// Owned repositories flagged active, newest first
    pub fn active_repos(&self) -> impl Iterator<Item = &OwnRepoSummary> {
        self.own_repos.iter().filter(|r| r.is_active)
    }
}

/// Build the comprehensive summary from fetched records
///
/// Forks among `owned` are dropped entirely. The owned list is returned
/// sorted by `updated_at`, newest first, with ties in input order and
/// repositories without a timestamp last.
pub fn extract_comprehensive_data(
    starred: &[StarEvent],
    owned: &[RepositoryRecord],
    activity: ActivitySummary,
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> ComprehensiveSummary {
    let recent_cutoff = config.recent_cutoff(now);
    let very_recent_cutoff = config.very_recent_cutoff(now);
    let maintained_cutoff = days_before(now, MAINTAINED_WINDOW_DAYS);

    let mut summary = ComprehensiveSummary {
        activity,
        ..Default::default()
    };

    for star in starred {
        let repo = &star.repo;
        summary.all_topics.extend(repo.topics.iter().map(String::as_str));

        if let Some(ref language) = repo.language {
            summary.all_languages.add(language);
            summary.language_evolution.add(language);
        }

        let categories = categorize(&repo.description);
        count_categories(&mut summary.repo_categories, &categories);

        for topic in &repo.topics {
            summary
                .topic_timeline
                .entry(topic.clone())
                .or_default()
                .push(star.starred_at);
        }

        let info = StarredRepoSummary {
            name: repo.full_name.clone(),
            url: repo.html_url.clone(),
            description: repo.description.clone(),
            language: repo.language.clone(),
            topics: repo.topics.clone(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            starred_at: star.starred_at,
            is_recent: star.starred_at > recent_cutoff,
            is_very_recent: star.starred_at > very_recent_cutoff,
            categories,
        };

        if info.is_recent {
            summary.recent_stars.push(info.clone());
        }
        summary.starred.push(info);
    }

    for repo in owned.iter().filter(|r| !r.fork) {
        summary.all_topics.extend(repo.topics.iter().map(String::as_str));

        if let Some(ref language) = repo.language {
            summary.all_languages.add(language);
        }

        let categories = categorize(&repo.description);
        count_categories(&mut summary.repo_categories, &categories);

        summary.own_repos.push(OwnRepoSummary {
            name: repo.full_name.clone(),
            url: repo.html_url.clone(),
            description: repo.description.clone(),
            language: repo.language.clone(),
            topics: repo.topics.clone(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            updated_at: repo.updated_at,
            is_active: repo.updated_at.is_some_and(|t| t > recent_cutoff),
            is_private: repo.private,
            has_issues: repo.has_issues,
            open_issues: repo.open_issues_count,
            categories,
            size_kb: repo.size_kb,
            has_docs: repo.has_wiki || repo.has_pages,
            is_maintained: repo.updated_at.is_some_and(|t| t > maintained_cutoff),
        });
    }

    sort_by_recent_update(&mut summary.own_repos);
    summary
}

/// Stable sort, newest `updated_at` first
pub fn sort_by_recent_update(repos: &mut [OwnRepoSummary]) {
    repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

fn count_categories(counts: &mut BTreeMap<Category, u64>, categories: &[Category]) {
    for category in categories {
        *counts.entry(*category).or_insert(0) += 1;
    }
}
