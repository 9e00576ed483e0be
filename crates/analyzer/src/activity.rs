//! Recent activity fold

use crate::AnalysisConfig;
use chrono::{DateTime, NaiveDate, Utc};
use ghprofile_models::{bare_name, ActivityEvent, EventPayload};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// One commit message pushed to one of the user's repositories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitDetail {
    pub repo: String,
    pub message: String,
    pub date: NaiveDate,
}

/// Counters and repository sets accumulated over the recent window
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivitySummary {
    pub commits: u64,
    pub prs_created: u64,
    pub prs_reviewed: u64,
    pub issues_opened: u64,
    pub issues_commented: u64,
    pub repos_worked_on: BTreeSet<String>,
    pub repos_contributed: BTreeSet<String>,
    pub recent_commits_detail: Vec<CommitDetail>,
    pub collaboration_repos: BTreeSet<String>,
}

/// Ownership lookups used while folding events
///
/// A repository counts as a fork of one of the user's own repositories when
/// its bare name (without owner) matches the bare name of any owned
/// repository. This is a name heuristic, not fork-parent resolution.
struct Ownership<'a> {
    full_names: HashSet<&'a str>,
    bare_names: HashSet<&'a str>,
}

impl<'a> Ownership<'a> {
    fn new<I>(owned_full_names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let full_names: HashSet<&str> = owned_full_names.into_iter().collect();
        let bare_names = full_names.iter().copied().map(bare_name).collect();
        Self {
            full_names,
            bare_names,
        }
    }

    fn is_own(&self, repo: &str) -> bool {
        self.full_names.contains(repo)
    }

    fn is_fork_of_own(&self, repo: &str) -> bool {
        self.bare_names.contains(bare_name(repo))
    }
}

/// Fold events from the trailing recent window into an [`ActivitySummary`]
///
/// `owned_full_names` should list every repository the user owns, forks
/// included. Events with malformed timestamps are skipped, as are events
/// older than `now - recent_days`.
pub fn analyze_activity<'a, I>(
    events: &[ActivityEvent],
    owned_full_names: I,
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> ActivitySummary
where
    I: IntoIterator<Item = &'a str>,
{
    let ownership = Ownership::new(owned_full_names);
    let cutoff = config.recent_cutoff(now);
    let mut summary = ActivitySummary::default();

    for event in events {
        let Some(created_at) = event.timestamp() else {
            continue;
        };
        if created_at < cutoff {
            continue;
        }

        let repo = event.repo_name.as_str();
        let is_own = ownership.is_own(repo);
        let is_fork_of_own = ownership.is_fork_of_own(repo);

        match &event.payload {
            EventPayload::Push { commits } => {
                summary.commits += commits.len() as u64;
                summary.repos_worked_on.insert(repo.to_string());

                if is_own {
                    for commit in commits {
                        if summary.recent_commits_detail.len() >= config.max_recent_commits {
                            break;
                        }
                        summary.recent_commits_detail.push(CommitDetail {
                            repo: repo.to_string(),
                            message: commit.message.clone(),
                            date: created_at.date_naive(),
                        });
                    }
                } else if !is_fork_of_own {
                    summary.repos_contributed.insert(repo.to_string());
                }
            }
            EventPayload::PullRequest => {
                summary.prs_created += 1;
                if !is_own && !is_fork_of_own {
                    summary.collaboration_repos.insert(repo.to_string());
                }
            }
            EventPayload::PullRequestReview => summary.prs_reviewed += 1,
            EventPayload::Issues { action } => {
                if action.as_deref() == Some("opened") {
                    summary.issues_opened += 1;
                }
            }
            EventPayload::IssueComment => summary.issues_commented += 1,
            EventPayload::Other { .. } => {}
        }
    }

    summary
}
