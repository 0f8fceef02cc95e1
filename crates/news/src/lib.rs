//! # News - 新闻供给
//!
//! 市场情绪快照引擎的新闻抓取层
//!
//! ## 功能
//!
//! - CryptoPanic API 与通用 RSS 订阅源抓取
//! - 静态股票标题兜底
//! - 限流与统一的 HTTP 客户端配置
//! - 标题清理与稳定 ID 生成
//!
//! 单个源失败只记录告警并返回空列表，不会中断整次运行。

pub mod scraper;
pub mod types;

pub use scraper::{default_sources, FeedSpec, HeadlineSource, RateLimitedSource, DEFAULT_FEEDS};
pub use types::{Headline, HeadlineCategory, NewsError, NewsResult};
