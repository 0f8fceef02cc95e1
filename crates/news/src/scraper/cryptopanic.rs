//! CryptoPanic API 新闻源

use super::{create_http_client, generate_headline_id, HeadlineSource};
use crate::types::{Headline, HeadlineCategory, NewsError, NewsResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CryptoPanicResponse {
    results: Vec<CryptoPanicPost>,
}

#[derive(Debug, Deserialize)]
struct CryptoPanicPost {
    title: String,
    #[serde(default)]
    url: String,
    published_at: Option<String>,
    source: Option<CryptoPanicSourceInfo>,
    currencies: Option<Vec<Currency>>,
}

#[derive(Debug, Deserialize)]
struct CryptoPanicSourceInfo {
    title: String,
}

#[derive(Debug, Deserialize)]
struct Currency {
    code: String,
}

pub struct CryptoPanicSource {
    client: reqwest::Client,
    auth_token: String,
}

impl CryptoPanicSource {
    pub fn new() -> Self {
        Self {
            client: create_http_client().unwrap(),
            auth_token: "public".to_string(),
        }
    }

    pub fn with_auth_token(auth_token: String) -> Self {
        Self {
            client: create_http_client().unwrap(),
            auth_token,
        }
    }

    fn parse_response(&self, response: CryptoPanicResponse, limit: usize) -> Vec<Headline> {
        response
            .results
            .into_iter()
            .take(limit)
            .map(|post| {
                let published_at = post
                    .published_at
                    .as_deref()
                    .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                let currencies = post
                    .currencies
                    .unwrap_or_default()
                    .into_iter()
                    .map(|c| c.code)
                    .collect();

                Headline {
                    id: generate_headline_id(&post.url),
                    title: post.title,
                    source: post
                        .source
                        .map(|s| s.title)
                        .unwrap_or_else(|| "CryptoPanic".to_string()),
                    category: HeadlineCategory::Crypto,
                    url: post.url,
                    currencies,
                    published_at,
                    fetched_at: Utc::now(),
                }
            })
            .collect()
    }
}

impl Default for CryptoPanicSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HeadlineSource for CryptoPanicSource {
    fn name(&self) -> &str {
        "CryptoPanic"
    }

    fn category(&self) -> HeadlineCategory {
        HeadlineCategory::Crypto
    }

    async fn fetch_latest(&self, limit: usize) -> NewsResult<Vec<Headline>> {
        let url = format!(
            "https://cryptopanic.com/api/v1/posts/?auth_token={}&currencies=BTC,ETH&kind=news",
            self.auth_token
        );

        let response = self.client.get(&url).send().await?;
        let body = response.text().await?;
        let parsed: CryptoPanicResponse = serde_json::from_str(&body)
            .map_err(|e| NewsError::DataSource(format!("CryptoPanic response: {}", e)))?;

        let headlines = self.parse_response(parsed, limit);
        tracing::info!("Fetched {} headlines from CryptoPanic", headlines.len());
        Ok(headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "results": [
            {
                "title": "Bitcoin surges past resistance",
                "url": "https://example.com/btc-surge",
                "published_at": "2025-08-01T12:00:00Z",
                "source": {"title": "CoinDesk"},
                "currencies": [{"code": "BTC"}]
            },
            {
                "title": "Ethereum upgrade ships",
                "url": "https://example.com/eth-upgrade",
                "published_at": "2025-08-01T11:30:00Z",
                "source": {"title": "Decrypt"},
                "currencies": [{"code": "ETH"}, {"code": "BTC"}]
            }
        ]
    }"#;

    #[test]
    fn test_parse_response() {
        let source = CryptoPanicSource::new();
        let parsed: CryptoPanicResponse = serde_json::from_str(SAMPLE).unwrap();
        let headlines = source.parse_response(parsed, 10);

        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Bitcoin surges past resistance");
        assert_eq!(headlines[0].source, "CoinDesk");
        assert_eq!(headlines[0].currencies, vec!["BTC".to_string()]);
        assert_eq!(headlines[0].category, HeadlineCategory::Crypto);
        assert!(headlines[0].published_at.is_some());
        assert_eq!(headlines[1].currencies.len(), 2);
    }

    #[test]
    fn test_parse_response_respects_limit() {
        let source = CryptoPanicSource::new();
        let parsed: CryptoPanicResponse = serde_json::from_str(SAMPLE).unwrap();
        let headlines = source.parse_response(parsed, 1);

        assert_eq!(headlines.len(), 1);
    }

    #[test]
    fn test_missing_fields_are_tolerated() {
        let source = CryptoPanicSource::new();
        let parsed: CryptoPanicResponse = serde_json::from_str(
            r#"{"results": [{"title": "Minimal post"}]}"#,
        )
        .unwrap();
        let headlines = source.parse_response(parsed, 10);

        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].source, "CryptoPanic");
        assert!(headlines[0].published_at.is_none());
        assert!(headlines[0].currencies.is_empty());
    }
}
