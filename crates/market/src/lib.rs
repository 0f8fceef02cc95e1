//! # Market - 价格供给
//!
//! 为情绪快照引擎提供每个资产的现价与 24 小时涨跌幅。
//!
//! ## 功能
//!
//! - CoinGecko simple/price 加密货币报价
//! - 静态报价兜底（股票以及网络失败时的加密货币）
//!
//! 报价获取失败降级为静态兜底值，不会中断整次运行。

pub mod coingecko;
pub mod statics;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub type MarketResult<T> = Result<T, MarketError>;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("HTTP 请求失败: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("JSON 解析失败: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("未知资产: {0}")]
    UnknownAsset(String),
}

/// 单个资产的报价
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quote {
    /// 现价（美元）
    pub price: f64,
    /// 24 小时涨跌幅（百分比）
    pub change_24h: f64,
}

/// 价格供给接口
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// 供给名称
    fn name(&self) -> &str;

    /// 按资产符号批量获取报价
    async fn fetch_quotes(&self, symbols: &[&str]) -> MarketResult<HashMap<String, Quote>>;
}

/// 通用 HTTP 客户端配置
pub fn create_http_client() -> MarketResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("TradingAI/1.0")
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(Into::into)
}
