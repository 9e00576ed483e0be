//! Blog syndication feed reader

use crate::{CollectorError, Result};
use ghprofile_models::{truncate_text, BlogPost};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const DESCRIPTION_MAX_CHARS: usize = 150;

/// RSS 2.0 feed client
pub struct FeedReader {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: Option<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default, rename = "item")]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl FeedReader {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the latest posts; any failure yields an empty list
    pub async fn fetch_posts(&self, url: &str, max_posts: usize) -> Vec<BlogPost> {
        match self.try_fetch(url, max_posts).await {
            Ok(posts) => {
                debug!(url = url, count = posts.len(), "Fetched blog posts");
                posts
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to fetch blog feed");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str, max_posts: usize) -> Result<Vec<BlogPost>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(CollectorError::Api(format!(
                "Feed error: {} for {}",
                response.status(),
                url
            )));
        }

        let body = response.text().await?;
        parse_feed(&body, max_posts)
    }
}

/// Parse an RSS 2.0 document into at most `max_posts` summaries
pub fn parse_feed(xml: &str, max_posts: usize) -> Result<Vec<BlogPost>> {
    let doc: RssDocument =
        quick_xml::de::from_str(xml).map_err(|e| CollectorError::Parse(e.to_string()))?;

    let Some(channel) = doc.channel else {
        return Ok(Vec::new());
    };

    let posts = channel
        .items
        .into_iter()
        .take(max_posts)
        .map(|item| BlogPost {
            title: clean(item.title),
            link: clean(item.link),
            pub_date: clean(item.pub_date),
            description: truncate_text(&clean(item.description), DESCRIPTION_MAX_CHARS),
        })
        .collect();

    Ok(posts)
}

fn clean(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}
