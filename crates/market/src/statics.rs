//! 静态报价兜底源
//!
//! 股票没有免费实时 API，加密货币在网络失败时也退回这里。
//! 显式的占位数据源，接口不变即可换成真实行情。

use crate::{MarketResult, PriceProvider, Quote};
use async_trait::async_trait;
use std::collections::HashMap;

const STATIC_QUOTES: &[(&str, Quote)] = &[
    (
        "BTC",
        Quote {
            price: 67500.0,
            change_24h: 1.2,
        },
    ),
    (
        "ETH",
        Quote {
            price: 3200.0,
            change_24h: 0.8,
        },
    ),
    (
        "AAPL",
        Quote {
            price: 182.50,
            change_24h: 0.45,
        },
    ),
    (
        "NVDA",
        Quote {
            price: 131.20,
            change_24h: 1.05,
        },
    ),
];

pub struct StaticQuoteProvider;

impl StaticQuoteProvider {
    pub fn new() -> Self {
        Self
    }

    /// 单个资产的兜底报价
    pub fn quote_for(symbol: &str) -> Option<Quote> {
        STATIC_QUOTES
            .iter()
            .find(|(sym, _)| *sym == symbol)
            .map(|(_, q)| *q)
    }
}

impl Default for StaticQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for StaticQuoteProvider {
    fn name(&self) -> &str {
        "StaticQuotes"
    }

    async fn fetch_quotes(&self, symbols: &[&str]) -> MarketResult<HashMap<String, Quote>> {
        let quotes = symbols
            .iter()
            .filter_map(|sym| Self::quote_for(sym).map(|q| (sym.to_string(), q)))
            .collect();
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_quotes_cover_all_assets() {
        let provider = StaticQuoteProvider::new();
        let quotes = provider
            .fetch_quotes(&["BTC", "ETH", "AAPL", "NVDA"])
            .await
            .unwrap();

        assert_eq!(quotes.len(), 4);
        assert!(quotes["BTC"].price > 0.0);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_skipped() {
        let provider = StaticQuoteProvider::new();
        let quotes = provider.fetch_quotes(&["DOGE"]).await.unwrap();
        assert!(quotes.is_empty());
    }
}
