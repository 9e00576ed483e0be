//! GitHub API collector

use crate::{CollectorConfig, CollectorError, Result};
use chrono::{DateTime, Utc};
use ghprofile_models::{
    ActivityEvent, EventPayload, PushCommit, RepositoryRecord, StarEvent, UserProfile,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";
const ACCEPT_STAR: &str = "application/vnd.github.star+json";
const PER_PAGE: usize = 100;

/// GitHub API client
pub struct GithubCollector {
    client: Client,
    config: CollectorConfig,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    full_name: String,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    topics: Option<Vec<String>>,
    #[serde(default)]
    stargazers_count: Option<u64>,
    #[serde(default)]
    forks_count: Option<u64>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    fork: Option<bool>,
    #[serde(default)]
    private: Option<bool>,
    #[serde(default)]
    has_issues: Option<bool>,
    #[serde(default)]
    open_issues_count: Option<u64>,
    #[serde(default)]
    has_wiki: Option<bool>,
    #[serde(default)]
    has_pages: Option<bool>,
}

impl From<RepoResponse> for RepositoryRecord {
    fn from(raw: RepoResponse) -> Self {
        Self {
            full_name: raw.full_name,
            html_url: raw.html_url.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            language: raw.language.filter(|l| !l.is_empty()),
            topics: raw.topics.unwrap_or_default(),
            stargazers_count: raw.stargazers_count.unwrap_or(0),
            forks_count: raw.forks_count.unwrap_or(0),
            size_kb: raw.size.unwrap_or(0),
            updated_at: raw.updated_at.as_deref().and_then(parse_timestamp),
            fork: raw.fork.unwrap_or(false),
            private: raw.private.unwrap_or(false),
            has_issues: raw.has_issues.unwrap_or(false),
            open_issues_count: raw.open_issues_count.unwrap_or(0),
            has_wiki: raw.has_wiki.unwrap_or(false),
            has_pages: raw.has_pages.unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StarredResponse {
    #[serde(default)]
    starred_at: Option<String>,
    repo: RepoResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    public_repos: Option<u64>,
    #[serde(default)]
    followers: Option<u64>,
}

impl From<UserResponse> for UserProfile {
    fn from(raw: UserResponse) -> Self {
        Self {
            login: raw.login,
            name: raw.name,
            bio: raw.bio,
            location: raw.location,
            company: raw.company,
            public_repos: raw.public_repos.unwrap_or(0),
            followers: raw.followers.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventResponse {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    created_at: Option<String>,
    repo: EventRepo,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct EventRepo {
    name: String,
}

impl From<EventResponse> for ActivityEvent {
    fn from(raw: EventResponse) -> Self {
        let payload = match raw.event_type.as_str() {
            "PushEvent" => EventPayload::Push {
                commits: raw
                    .payload
                    .get("commits")
                    .and_then(|c| c.as_array())
                    .map(|commits| {
                        commits
                            .iter()
                            .map(|c| PushCommit {
                                message: c
                                    .get("message")
                                    .and_then(|m| m.as_str())
                                    .unwrap_or_default()
                                    .to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "PullRequestEvent" => EventPayload::PullRequest,
            "PullRequestReviewEvent" => EventPayload::PullRequestReview,
            "IssuesEvent" => EventPayload::Issues {
                action: raw
                    .payload
                    .get("action")
                    .and_then(|a| a.as_str())
                    .map(str::to_string),
            },
            "IssueCommentEvent" => EventPayload::IssueComment,
            other => EventPayload::Other {
                event_type: other.to_string(),
            },
        };

        Self {
            created_at: raw.created_at.unwrap_or_default(),
            repo_name: raw.repo.name,
            payload,
        }
    }
}

impl GithubCollector {
    /// Create a new GitHub collector
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);

        if let Some(ref token) = config.github_token {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch the user's public profile
    pub async fn get_user(&self, username: &str) -> Result<UserProfile> {
        let url = format!("{}/users/{}", self.config.api_base, username);
        let user: UserResponse = self.request_json(&url, None).await?;
        Ok(user.into())
    }

    /// Fetch every repository the user starred, with star timestamps
    pub async fn get_starred_repos(&self, username: &str) -> Result<Vec<StarEvent>> {
        info!(username = username, "Fetching starred repositories");

        let path = format!("/users/{}/starred?", username);
        let raw: Vec<StarredResponse> = self.get_paginated(&path, Some(ACCEPT_STAR)).await?;

        let stars: Vec<StarEvent> = raw
            .into_iter()
            .filter_map(|item| {
                let starred_at = item.starred_at.as_deref().and_then(parse_timestamp);
                match starred_at {
                    Some(starred_at) => Some(StarEvent {
                        repo: item.repo.into(),
                        starred_at,
                    }),
                    None => {
                        debug!(repo = %item.repo.full_name, "Skipping star without a valid timestamp");
                        None
                    }
                }
            })
            .collect();

        info!(username = username, count = stars.len(), "Fetched starred repositories");
        Ok(stars)
    }

    /// Fetch the user's own repositories, most recently updated first
    pub async fn get_user_repos(&self, username: &str) -> Result<Vec<RepositoryRecord>> {
        info!(username = username, "Fetching own repositories");

        let path = format!("/users/{}/repos?sort=updated", username);
        let raw: Vec<RepoResponse> = self.get_paginated(&path, None).await?;
        let repos: Vec<RepositoryRecord> = raw.into_iter().map(Into::into).collect();

        info!(username = username, count = repos.len(), "Fetched own repositories");
        Ok(repos)
    }

    /// Fetch the most recent page of public events
    pub async fn get_recent_activity(&self, username: &str) -> Result<Vec<ActivityEvent>> {
        let url = format!(
            "{}/users/{}/events/public?per_page={}",
            self.config.api_base, username, PER_PAGE
        );

        let raw: Vec<serde_json::Value> = self.request_json(&url, None).await?;
        let events: Vec<ActivityEvent> = decode_records::<EventResponse>(raw)
            .into_iter()
            .map(Into::into)
            .collect();

        info!(username = username, count = events.len(), "Fetched recent events");
        Ok(events)
    }

    /// Walk a paginated listing until an empty or short page
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        accept: Option<&'static str>,
    ) -> Result<Vec<T>> {
        let separator = if path.ends_with('?') { "" } else { "&" };
        let mut items = Vec::new();

        for page in 1..=self.config.max_pages {
            let url = format!(
                "{}{}{}page={}&per_page={}",
                self.config.api_base, path, separator, page, PER_PAGE
            );

            let batch: Vec<serde_json::Value> = self.request_json(&url, accept).await?;
            let len = batch.len();
            debug!(page = page, count = len, "Fetched page");
            items.extend(decode_records(batch));

            if len < PER_PAGE {
                break;
            }
        }

        Ok(items)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &str,
        accept: Option<&'static str>,
    ) -> Result<T> {
        self.config
            .retry
            .run(url, || async move {
                let mut request = self.client.get(url);
                if let Some(accept) = accept {
                    request = request.header(ACCEPT, accept);
                }

                let response = request.send().await?;
                check_status(response.status(), response.headers(), Utc::now().timestamp())?;

                let body: T = response.json().await?;
                Ok::<T, CollectorError>(body)
            })
            .await
    }
}

/// Decode listing entries one at a time, skipping malformed ones
fn decode_records<T: DeserializeOwned>(values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| CollectorError::Parse(format!("invalid header value: {}", e)))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Map a GitHub response status to a collector outcome
///
/// Rate limits (429, or 403 with an exhausted quota or a `retry-after`) are
/// reported with the number of seconds to wait; 5xx responses are transient.
fn check_status(status: StatusCode, headers: &HeaderMap, now: i64) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    let header_u64 = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    };

    let quota_exhausted = headers
        .get("x-ratelimit-remaining")
        .is_some_and(|v| v == "0");
    let retry_after = header_u64(RETRY_AFTER.as_str());

    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && (quota_exhausted || retry_after.is_some()))
    {
        let wait = retry_after.unwrap_or_else(|| {
            header_u64("x-ratelimit-reset")
                .map(|reset| reset.saturating_sub(now.max(0) as u64))
                .unwrap_or(60)
        });
        return Err(CollectorError::RateLimited(wait));
    }

    if status.is_server_error() {
        return Err(CollectorError::Server(status.as_u16()));
    }

    Err(CollectorError::Api(format!("GitHub API error: {}", status)))
}
