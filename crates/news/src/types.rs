//! 核心类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type NewsResult<T> = Result<T, NewsError>;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP 请求失败: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("订阅源解析失败: {0}")]
    FeedParsing(String),

    #[error("JSON 解析失败: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("数据源错误: {0}")]
    DataSource(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 新闻类别
///
/// Crypto/Stocks 是泛类别，Aapl/Nvda 标记单只股票的专属订阅源。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadlineCategory {
    Crypto,
    Stocks,
    Aapl,
    Nvda,
}

impl std::fmt::Display for HeadlineCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadlineCategory::Crypto => write!(f, "crypto"),
            HeadlineCategory::Stocks => write!(f, "stocks"),
            HeadlineCategory::Aapl => write!(f, "aapl"),
            HeadlineCategory::Nvda => write!(f, "nvda"),
        }
    }
}

/// 新闻标题记录
///
/// 抓取后不可变，单次运行内消费一次后丢弃。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    /// 唯一标识（根据 URL 生成的哈希）
    pub id: String,
    /// 标题
    pub title: String,
    /// 来源名称
    pub source: String,
    /// 类别
    pub category: HeadlineCategory,
    /// URL
    pub url: String,
    /// 相关币种（CryptoPanic 的 currencies 标签）
    pub currencies: Vec<String>,
    /// 发布时间（部分源缺失）
    pub published_at: Option<DateTime<Utc>>,
    /// 抓取时间
    pub fetched_at: DateTime<Utc>,
}
