//! Remote skills catalogue reader

use crate::{CollectorError, Result};
use ghprofile_models::{SkillCatalogue, SkillGroup};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches a YAML (or JSON) skills document
pub struct SkillsReader {
    client: Client,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCatalogue {
    Listed { skills: Vec<RawGroup> },
    Mapping(serde_yaml::Mapping),
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    category: String,
    #[serde(default, alias = "skills")]
    items: Vec<String>,
}

impl SkillsReader {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch and parse the catalogue; any failure yields an empty catalogue
    pub async fn fetch(&self, url: &str) -> SkillCatalogue {
        match self.try_fetch(url).await {
            Ok(catalogue) => {
                debug!(url = url, groups = catalogue.groups.len(), "Fetched skills catalogue");
                catalogue
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to fetch skills catalogue");
                SkillCatalogue::default()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<SkillCatalogue> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(CollectorError::Api(format!(
                "Skills document error: {} for {}",
                response.status(),
                url
            )));
        }

        let body = response.text().await?;
        parse_catalogue(&body)
    }
}

/// Parse a skills document
///
/// Two shapes are accepted: a `skills` list of `{category, items}` entries, or
/// a plain mapping of category to skill list. Empty categories are dropped.
pub fn parse_catalogue(text: &str) -> Result<SkillCatalogue> {
    let raw: RawCatalogue =
        serde_yaml::from_str(text).map_err(|e| CollectorError::Parse(e.to_string()))?;

    let groups: Vec<SkillGroup> = match raw {
        RawCatalogue::Listed { skills } => skills
            .into_iter()
            .map(|g| SkillGroup {
                category: g.category,
                skills: g.items,
            })
            .collect(),
        RawCatalogue::Mapping(mapping) => mapping
            .into_iter()
            .filter_map(|(key, value)| {
                let category = key.as_str()?.to_string();
                let skills = value
                    .as_sequence()?
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                Some(SkillGroup { category, skills })
            })
            .collect(),
    };

    Ok(SkillCatalogue {
        groups: groups.into_iter().filter(|g| !g.skills.is_empty()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listed_shape() {
        let doc = r#"
skills:
  - category: Languages
    items: [Rust, Go, Python]
  - category: Cloud
    skills:
      - AWS
      - GCP
  - category: Empty
    items: []
"#;
        let catalogue = parse_catalogue(doc).unwrap();
        assert_eq!(catalogue.groups.len(), 2);
        assert_eq!(catalogue.groups[0].category, "Languages");
        assert_eq!(catalogue.groups[0].skills, vec!["Rust", "Go", "Python"]);
        assert_eq!(catalogue.groups[1].skills, vec!["AWS", "GCP"]);
    }

    #[test]
    fn parses_mapping_shape_in_document_order() {
        let doc = "Observability: [Prometheus, Grafana]\nContainers: [Docker, Kubernetes]\n";
        let catalogue = parse_catalogue(doc).unwrap();
        let categories: Vec<&str> = catalogue.groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["Observability", "Containers"]);
    }

    #[test]
    fn accepts_json() {
        let doc = r#"{"skills": [{"category": "Languages", "items": ["Rust"]}]}"#;
        let catalogue = parse_catalogue(doc).unwrap();
        assert_eq!(catalogue.groups[0].skills, vec!["Rust"]);
    }

    #[test]
    fn scalar_document_is_rejected() {
        assert!(matches!(
            parse_catalogue("just a string"),
            Err(CollectorError::Parse(_))
        ));
    }
}
