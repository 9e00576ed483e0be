//! Trend labels derived from a comprehensive summary

use crate::categories::Category;
use crate::summary::ComprehensiveSummary;
use crate::tally::Tally;
use serde::Serialize;
use std::fmt;

/// Recent topics considered when looking for emerging ones
const EMERGING_CANDIDATES: usize = 10;
/// Share of a topic's occurrences that must be recent for it to be emerging
const EMERGING_RATIO: f64 = 0.30;
const GROWING_CANDIDATES: usize = 5;
const GROWING_MIN_COUNT: u64 = 2;
const EXPERTISE_MIN_COUNT: u64 = 3;

/// A topic concentrated in recent stars
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergingTopic {
    pub topic: String,
    pub recent_count: u64,
    pub total_count: u64,
}

impl EmergingTopic {
    pub fn ratio(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.recent_count as f64 / self.total_count as f64
    }
}

/// Overall commit intensity over the recent window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityPattern {
    HighlyActive,
    Active,
    Moderate,
    Light,
}

impl ActivityPattern {
    pub fn from_commits(commits: u64) -> Self {
        match commits {
            0..=5 => ActivityPattern::Light,
            6..=20 => ActivityPattern::Moderate,
            21..=50 => ActivityPattern::Active,
            _ => ActivityPattern::HighlyActive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityPattern::HighlyActive => "highly_active",
            ActivityPattern::Active => "active",
            ActivityPattern::Moderate => "moderate",
            ActivityPattern::Light => "light",
        }
    }
}

impl fmt::Display for ActivityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend labels for one run
#[derive(Debug, Clone, Serialize)]
pub struct TrendSummary {
    pub emerging_topics: Vec<EmergingTopic>,
    pub growing_languages: Vec<String>,
    pub activity_pattern: ActivityPattern,
    pub expertise_areas: Vec<Category>,
}

/// Derive trend labels; a pure function of `summary`
pub fn identify_trends(summary: &ComprehensiveSummary) -> TrendSummary {
    let mut recent_topics = Tally::new();
    let mut recent_languages = Tally::new();
    for star in &summary.recent_stars {
        recent_topics.extend(star.topics.iter().map(String::as_str));
        if let Some(ref language) = star.language {
            recent_languages.add(language);
        }
    }

    TrendSummary {
        emerging_topics: emerging_topics(&recent_topics, &summary.all_topics),
        growing_languages: growing_languages(&recent_languages),
        activity_pattern: ActivityPattern::from_commits(summary.activity.commits),
        expertise_areas: summary
            .repo_categories
            .iter()
            .filter(|(_, &count)| count >= EXPERTISE_MIN_COUNT)
            .map(|(category, _)| *category)
            .collect(),
    }
}

fn emerging_topics(recent: &Tally, all: &Tally) -> Vec<EmergingTopic> {
    recent
        .most_common(EMERGING_CANDIDATES)
        .into_iter()
        .map(|(topic, recent_count)| EmergingTopic {
            topic: topic.to_string(),
            recent_count,
            total_count: all.count(topic),
        })
        .filter(|t| t.ratio() > EMERGING_RATIO)
        .collect()
}

fn growing_languages(recent: &Tally) -> Vec<String> {
    recent
        .most_common(GROWING_CANDIDATES)
        .into_iter()
        .filter(|(_, count)| *count >= GROWING_MIN_COUNT)
        .map(|(language, _)| language.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::StarredRepoSummary;
    use chrono::{TimeZone, Utc};

    fn recent_star(language: Option<&str>, topics: &[&str]) -> StarredRepoSummary {
        StarredRepoSummary {
            name: "o/r".to_string(),
            url: String::new(),
            description: String::new(),
            language: language.map(str::to_string),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            stars: 0,
            forks: 0,
            starred_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            is_recent: true,
            is_very_recent: true,
            categories: Vec::new(),
        }
    }

    fn tally_of(key: &str, n: usize) -> Tally {
        let mut tally = Tally::new();
        for _ in 0..n {
            tally.add(key);
        }
        tally
    }

    #[test]
    fn activity_pattern_thresholds() {
        assert_eq!(ActivityPattern::from_commits(60), ActivityPattern::HighlyActive);
        assert_eq!(ActivityPattern::from_commits(51), ActivityPattern::HighlyActive);
        assert_eq!(ActivityPattern::from_commits(50), ActivityPattern::Active);
        assert_eq!(ActivityPattern::from_commits(21), ActivityPattern::Active);
        assert_eq!(ActivityPattern::from_commits(20), ActivityPattern::Moderate);
        assert_eq!(ActivityPattern::from_commits(6), ActivityPattern::Moderate);
        assert_eq!(ActivityPattern::from_commits(5), ActivityPattern::Light);
        assert_eq!(ActivityPattern::from_commits(0), ActivityPattern::Light);
    }

    #[test]
    fn activity_pattern_is_monotonic_over_range() {
        let rank = |p: ActivityPattern| match p {
            ActivityPattern::Light => 0,
            ActivityPattern::Moderate => 1,
            ActivityPattern::Active => 2,
            ActivityPattern::HighlyActive => 3,
        };
        let mut previous = 0;
        for commits in 0..200 {
            let current = rank(ActivityPattern::from_commits(commits));
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn emerging_ratio_above_threshold_is_included() {
        let topics = emerging_topics(&tally_of("k8s", 4), &tally_of("k8s", 10));
        assert_eq!(
            topics,
            vec![EmergingTopic {
                topic: "k8s".to_string(),
                recent_count: 4,
                total_count: 10,
            }]
        );
    }

    #[test]
    fn emerging_ratio_at_threshold_is_excluded() {
        let topics = emerging_topics(&tally_of("k8s", 3), &tally_of("k8s", 10));
        assert!(topics.is_empty());
    }

    #[test]
    fn emerging_topics_hold_invariants() {
        let mut summary = ComprehensiveSummary::default();
        let topic_sets: [&[&str]; 4] = [&["a", "b"], &["a"], &["c"], &["a", "d"]];
        for topics in topic_sets {
            summary.recent_stars.push(recent_star(None, topics));
            summary.all_topics.extend(topics.iter().copied());
        }
        summary.all_topics.extend(["b", "b", "b", "c", "c", "c", "c"]);

        let trends = identify_trends(&summary);
        for topic in &trends.emerging_topics {
            assert!(topic.recent_count <= topic.total_count);
            assert!(topic.ratio() > EMERGING_RATIO);
        }
        let names: Vec<&str> = trends.emerging_topics.iter().map(|t| t.topic.as_str()).collect();
        assert_eq!(names, vec!["a", "d"]);
    }

    #[test]
    fn growing_languages_need_two_recent_stars() {
        let mut summary = ComprehensiveSummary::default();
        for language in ["Rust", "Go", "Rust", "Zig", "Go", "Go", "Python", "Nim", "Nim", "C", "C"] {
            summary.recent_stars.push(recent_star(Some(language), &[]));
        }
        summary.recent_stars.push(recent_star(None, &[]));

        let trends = identify_trends(&summary);
        assert_eq!(trends.growing_languages, vec!["Go", "Rust", "Nim", "C"]);
        assert!(trends.growing_languages.len() <= GROWING_CANDIDATES);
    }

    #[test]
    fn expertise_areas_need_three() {
        let mut summary = ComprehensiveSummary::default();
        summary.repo_categories.insert(Category::Cloud, 3);
        summary.repo_categories.insert(Category::Frontend, 2);
        summary.repo_categories.insert(Category::Devops, 7);

        let trends = identify_trends(&summary);
        assert_eq!(trends.expertise_areas, vec![Category::Devops, Category::Cloud]);
    }
}
