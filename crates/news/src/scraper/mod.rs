//! 新闻抓取模块

pub mod cryptopanic;
pub mod rss;
pub mod stocks;

use crate::types::{Headline, HeadlineCategory, NewsResult};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::sync::Arc;

/// 新闻源接口
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// 新闻源名称
    fn name(&self) -> &str;

    /// 新闻源类别
    fn category(&self) -> HeadlineCategory;

    /// 抓取最新标题
    async fn fetch_latest(&self, limit: usize) -> NewsResult<Vec<Headline>>;
}

/// 限流新闻源包装器
pub struct RateLimitedSource<S: HeadlineSource> {
    source: S,
    rate_limiter: Arc<
        RateLimiter<
            governor::state::direct::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl<S: HeadlineSource> RateLimitedSource<S> {
    pub fn new(source: S, requests_per_minute: u32) -> Self {
        let quota = Quota::per_minute(
            std::num::NonZeroU32::new(requests_per_minute).unwrap_or(nonzero!(10u32)),
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            source,
            rate_limiter,
        }
    }

    async fn wait_for_permit(&self) {
        self.rate_limiter.until_ready().await;
    }
}

#[async_trait]
impl<S: HeadlineSource> HeadlineSource for RateLimitedSource<S> {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn category(&self) -> HeadlineCategory {
        self.source.category()
    }

    async fn fetch_latest(&self, limit: usize) -> NewsResult<Vec<Headline>> {
        self.wait_for_permit().await;
        self.source.fetch_latest(limit).await
    }
}

/// RSS 订阅源配置
#[derive(Debug, Clone)]
pub struct FeedSpec {
    pub name: &'static str,
    pub url: &'static str,
    pub category: HeadlineCategory,
}

/// 默认订阅源列表（静态配置）
pub const DEFAULT_FEEDS: &[FeedSpec] = &[
    FeedSpec {
        name: "CoinDesk",
        url: "https://www.coindesk.com/arc/outboundfeeds/rss/",
        category: HeadlineCategory::Crypto,
    },
    FeedSpec {
        name: "CoinTelegraph",
        url: "https://cointelegraph.com/rss",
        category: HeadlineCategory::Crypto,
    },
    FeedSpec {
        name: "Yahoo Finance AAPL",
        url: "https://feeds.finance.yahoo.com/rss/2.0/headline?s=AAPL&region=US&lang=en-US",
        category: HeadlineCategory::Aapl,
    },
    FeedSpec {
        name: "Yahoo Finance NVDA",
        url: "https://feeds.finance.yahoo.com/rss/2.0/headline?s=NVDA&region=US&lang=en-US",
        category: HeadlineCategory::Nvda,
    },
];

/// 构建默认新闻源集合：CryptoPanic API + RSS 订阅源 + 静态股票标题兜底
///
/// CryptoPanic 的公共配额很紧，默认套一层限流。
pub fn default_sources() -> Vec<Box<dyn HeadlineSource>> {
    let mut sources: Vec<Box<dyn HeadlineSource>> = vec![Box::new(RateLimitedSource::new(
        cryptopanic::CryptoPanicSource::new(),
        10,
    ))];

    for feed in DEFAULT_FEEDS {
        sources.push(Box::new(rss::RssSource::new(
            feed.name,
            feed.url,
            feed.category,
        )));
    }

    sources.push(Box::new(stocks::StaticStockSource::new()));
    sources
}

/// 通用 HTTP 客户端配置
pub fn create_http_client() -> NewsResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("TradingAI/1.0")
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(Into::into)
}

/// 生成标题 ID（基于 URL 的 SHA256 哈希）
pub fn generate_headline_id(url: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// 清理订阅源标题：去除标记并压缩空白
pub fn clean_title(raw: &str) -> String {
    let cleaned = ammonia::Builder::empty()
        .clean(raw)
        .to_string();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_headline_id_is_stable() {
        let a = generate_headline_id("https://example.com/post/1");
        let b = generate_headline_id("https://example.com/post/1");
        let c = generate_headline_id("https://example.com/post/2");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_clean_title_strips_markup() {
        let cleaned = clean_title("<b>Bitcoin</b>   surges \n to  new high");
        assert_eq!(cleaned, "Bitcoin surges to new high");
    }

    #[test]
    fn test_default_sources_cover_all_categories() {
        let sources = default_sources();
        assert!(sources.len() >= 4);

        let categories: Vec<_> = sources.iter().map(|s| s.category()).collect();
        assert!(categories.contains(&HeadlineCategory::Crypto));
        assert!(categories.contains(&HeadlineCategory::Aapl));
        assert!(categories.contains(&HeadlineCategory::Nvda));
    }
}
