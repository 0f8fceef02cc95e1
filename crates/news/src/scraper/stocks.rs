//! 静态股票标题兜底源
//!
//! 股票源没有免费稳定的 API，实时订阅源失败或为空时由这里补充。

use super::{generate_headline_id, HeadlineSource};
use crate::types::{Headline, HeadlineCategory, NewsResult};
use async_trait::async_trait;
use chrono::Utc;

const FALLBACK_HEADLINES: &[(&str, HeadlineCategory)] = &[
    (
        "Apple continues AI integration push across product lineup",
        HeadlineCategory::Aapl,
    ),
    (
        "NVIDIA sees strong demand for AI chips",
        HeadlineCategory::Nvda,
    ),
    (
        "Tech stocks rally on positive earnings",
        HeadlineCategory::Stocks,
    ),
];

pub struct StaticStockSource;

impl StaticStockSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StaticStockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HeadlineSource for StaticStockSource {
    fn name(&self) -> &str {
        "StaticStocks"
    }

    fn category(&self) -> HeadlineCategory {
        HeadlineCategory::Stocks
    }

    async fn fetch_latest(&self, limit: usize) -> NewsResult<Vec<Headline>> {
        let headlines: Vec<Headline> = FALLBACK_HEADLINES
            .iter()
            .take(limit)
            .map(|(title, category)| Headline {
                id: generate_headline_id(title),
                title: title.to_string(),
                source: "StaticStocks".to_string(),
                category: *category,
                url: String::new(),
                currencies: Vec::new(),
                // 静态标题没有发布时间，时近权重按缺省 0.7 处理
                published_at: None,
                fetched_at: Utc::now(),
            })
            .collect();

        Ok(headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_yields_fixed_headlines() {
        let source = StaticStockSource::new();
        let headlines = source.fetch_latest(10).await.unwrap();

        assert_eq!(headlines.len(), 3);
        assert_eq!(headlines[0].category, HeadlineCategory::Aapl);
        assert_eq!(headlines[1].category, HeadlineCategory::Nvda);
        assert!(headlines.iter().all(|h| h.published_at.is_none()));
    }
}
