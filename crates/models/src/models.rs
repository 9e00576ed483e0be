//! Repository, profile and content models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GitHub repository as seen during one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub full_name: String,
    pub html_url: String,
    pub description: String,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub size_kb: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub fork: bool,
    pub private: bool,
    pub has_issues: bool,
    pub open_issues_count: u64,
    pub has_wiki: bool,
    pub has_pages: bool,
}

/// Strip the `owner/` prefix from a full repository name
pub fn bare_name(full_name: &str) -> &str {
    full_name.rsplit('/').next().unwrap_or(full_name)
}

/// A repository starred by the observed user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarEvent {
    pub repo: RepositoryRecord,
    pub starred_at: DateTime<Utc>,
}

/// Public profile of the observed user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub public_repos: u64,
    pub followers: u64,
}

impl UserProfile {
    /// Display name, falling back to the login
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.login)
    }
}

/// A blog post summary taken from a syndication feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
}

/// Skills grouped under a category heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<String>,
}

/// Skills document fetched from a remote source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCatalogue {
    pub groups: Vec<SkillGroup>,
}

impl SkillCatalogue {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_strips_owner() {
        assert_eq!(bare_name("octocat/hello-world"), "hello-world");
        assert_eq!(bare_name("standalone"), "standalone");
    }

    #[test]
    fn display_name_falls_back_to_login() {
        let mut user = UserProfile {
            login: "octocat".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "octocat");

        user.name = Some(String::new());
        assert_eq!(user.display_name(), "octocat");

        user.name = Some("The Octocat".to_string());
        assert_eq!(user.display_name(), "The Octocat");
    }
}
