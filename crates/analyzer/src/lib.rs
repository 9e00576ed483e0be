//! ghprofile Analyzer
//!
//! Turns fetched repositories, stars and events into a comprehensive summary
//! and trend labels. Everything here is synchronous and free of I/O; the
//! reference time is always passed in.

mod activity;
mod categories;
mod summary;
mod tally;
mod trends;

pub use activity::{analyze_activity, ActivitySummary, CommitDetail};
pub use categories::{categorize, Category};
pub use summary::{
    extract_comprehensive_data, sort_by_recent_update, ComprehensiveSummary, OwnRepoSummary,
    StarredRepoSummary,
};
pub use tally::Tally;
pub use trends::{identify_trends, ActivityPattern, EmergingTopic, TrendSummary};

use chrono::{DateTime, TimeDelta, Utc};
use ghprofile_models::{ActivityEvent, RepositoryRecord, StarEvent};
use tracing::debug;

/// Window sizes and limits for one aggregation pass
///
/// `very_recent_days` defaults to a value larger than `recent_days`, so the
/// two recency flags are independent rather than nested.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub recent_days: u32,
    pub very_recent_days: u32,
    pub max_recent_commits: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recent_days: 30,
            very_recent_days: 90,
            max_recent_commits: 10,
        }
    }
}

impl AnalysisConfig {
    pub fn recent_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        days_before(now, i64::from(self.recent_days))
    }

    pub fn very_recent_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        days_before(now, i64::from(self.very_recent_days))
    }
}

/// `now` minus `days`, saturating at the earliest representable instant
pub(crate) fn days_before(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    TimeDelta::try_days(days)
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Run the full aggregation: activity fold, comprehensive summary, trends
pub fn summarize(
    starred: &[StarEvent],
    owned: &[RepositoryRecord],
    events: &[ActivityEvent],
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> (ComprehensiveSummary, TrendSummary) {
    let activity = analyze_activity(
        events,
        owned.iter().map(|r| r.full_name.as_str()),
        now,
        config,
    );
    let summary = extract_comprehensive_data(starred, owned, activity, now, config);
    let trends = identify_trends(&summary);

    debug!(
        starred = summary.starred.len(),
        own_repos = summary.own_repos.len(),
        recent_stars = summary.recent_stars.len(),
        commits = summary.activity.commits,
        pattern = %trends.activity_pattern,
        "Aggregated profile data"
    );

    (summary, trends)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ghprofile_models::{EventPayload, PushCommit};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()
    }

    fn push(repo: &str, commits: usize) -> ActivityEvent {
        ActivityEvent {
            created_at: "2024-03-01T09:00:00Z".to_string(),
            repo_name: repo.to_string(),
            payload: EventPayload::Push {
                commits: vec![PushCommit::default(); commits],
            },
        }
    }

    fn owned(name: &str, updated: DateTime<Utc>, fork: bool) -> RepositoryRecord {
        RepositoryRecord {
            full_name: name.to_string(),
            updated_at: Some(updated),
            fork,
            ..Default::default()
        }
    }

    #[test]
    fn empty_inputs_give_empty_summary() {
        let (summary, trends) = summarize(&[], &[], &[], now(), &AnalysisConfig::default());
        assert!(summary.starred.is_empty());
        assert!(summary.own_repos.is_empty());
        assert_eq!(summary.activity.commits, 0);
        assert!(trends.emerging_topics.is_empty());
        assert!(trends.growing_languages.is_empty());
        assert!(trends.expertise_areas.is_empty());
        assert_eq!(trends.activity_pattern, ActivityPattern::Light);
    }

    #[test]
    fn scenario_owned_order_and_activity_flags() {
        let repos = vec![
            owned("a/x", Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(), false),
            owned("a/y", Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(), false),
        ];
        let config = AnalysisConfig::default();
        let (summary, _) = summarize(&[], &repos, &[], now(), &config);

        let names: Vec<&str> = summary.own_repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a/y", "a/x"]);
        assert!(summary.own_repos[0].is_active);
        assert_eq!(
            summary.own_repos[1].is_active,
            repos[0].updated_at.unwrap() > config.recent_cutoff(now())
        );
    }

    #[test]
    fn scenario_commit_counts_drive_pattern() {
        let repos = vec![owned("me/tool", now(), false)];
        let config = AnalysisConfig::default();

        let (_, trends) = summarize(&[], &repos, &[push("me/tool", 60)], now(), &config);
        assert_eq!(trends.activity_pattern, ActivityPattern::HighlyActive);

        let (_, trends) = summarize(&[], &repos, &[push("me/tool", 51)], now(), &config);
        assert_eq!(trends.activity_pattern, ActivityPattern::HighlyActive);

        let (_, trends) = summarize(
            &[],
            &repos,
            &[push("me/tool", 30), push("me/tool", 20)],
            now(),
            &config,
        );
        assert_eq!(trends.activity_pattern, ActivityPattern::Active);
    }

    #[test]
    fn huge_windows_saturate_instead_of_overflowing() {
        let config = AnalysisConfig {
            recent_days: 200_000_000,
            very_recent_days: u32::MAX,
            ..AnalysisConfig::default()
        };
        assert_eq!(config.recent_cutoff(now()), DateTime::<Utc>::MIN_UTC);
        assert_eq!(config.very_recent_cutoff(now()), DateTime::<Utc>::MIN_UTC);

        let repos = vec![owned("me/tool", Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap(), false)];
        let star = StarEvent {
            repo: RepositoryRecord::default(),
            starred_at: Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap(),
        };
        let (summary, _) = summarize(&[star], &repos, &[push("me/tool", 3)], now(), &config);

        assert!(summary.own_repos[0].is_active);
        assert!(summary.starred[0].is_recent);
        assert!(summary.starred[0].is_very_recent);
        assert_eq!(summary.activity.commits, 3);
    }

    #[test]
    fn forks_still_count_for_ownership() {
        let repos = vec![owned("me/forked", now(), true)];
        let (summary, _) = summarize(
            &[],
            &repos,
            &[push("me/forked", 2)],
            now(),
            &AnalysisConfig::default(),
        );

        assert!(summary.own_repos.is_empty());
        assert_eq!(summary.activity.recent_commits_detail.len(), 2);
        assert!(summary.activity.repos_contributed.is_empty());
    }

    #[test]
    fn malformed_event_does_not_touch_counters() {
        let mut event = push("me/tool", 5);
        event.created_at = "not-a-date".to_string();
        let (summary, trends) = summarize(&[], &[], &[event], now(), &AnalysisConfig::default());

        assert_eq!(summary.activity.commits, 0);
        assert!(summary.activity.repos_worked_on.is_empty());
        assert_eq!(trends.activity_pattern, ActivityPattern::Light);
    }
}
