//! RSS 通用新闻源

use super::{clean_title, create_http_client, generate_headline_id, HeadlineSource};
use crate::types::{Headline, HeadlineCategory, NewsError, NewsResult};
use async_trait::async_trait;
use chrono::Utc;

pub struct RssSource {
    client: reqwest::Client,
    name: &'static str,
    feed_url: String,
    category: HeadlineCategory,
}

impl RssSource {
    pub fn new(name: &'static str, feed_url: &str, category: HeadlineCategory) -> Self {
        Self {
            client: create_http_client().unwrap(),
            name,
            feed_url: feed_url.to_string(),
            category,
        }
    }
}

#[async_trait]
impl HeadlineSource for RssSource {
    fn name(&self) -> &str {
        self.name
    }

    fn category(&self) -> HeadlineCategory {
        self.category
    }

    async fn fetch_latest(&self, limit: usize) -> NewsResult<Vec<Headline>> {
        let response = self.client.get(&self.feed_url).send().await?;
        let content = response.bytes().await?;

        let feed = feed_rs::parser::parse(&content[..])
            .map_err(|e| NewsError::FeedParsing(e.to_string()))?;

        let headlines: Vec<Headline> = feed
            .entries
            .into_iter()
            .take(limit)
            .filter_map(|entry| {
                let title = entry
                    .title
                    .map(|t| clean_title(&t.content))
                    .unwrap_or_default();
                if title.is_empty() {
                    return None;
                }

                let url = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default();

                let published_at = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.with_timezone(&Utc));

                Some(Headline {
                    id: generate_headline_id(&url),
                    title,
                    source: self.name.to_string(),
                    category: self.category,
                    url,
                    currencies: Vec::new(),
                    published_at,
                    fetched_at: Utc::now(),
                })
            })
            .collect();

        tracing::info!("Fetched {} headlines from {}", headlines.len(), self.name);
        Ok(headlines)
    }
}
