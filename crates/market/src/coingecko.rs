//! CoinGecko 报价源

use crate::{create_http_client, MarketResult, PriceProvider, Quote};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// 资产符号到 CoinGecko 币种 ID 的映射
const COIN_IDS: &[(&str, &str)] = &[("BTC", "bitcoin"), ("ETH", "ethereum")];

#[derive(Debug, Deserialize)]
struct CoinPrice {
    usd: f64,
    #[serde(default)]
    usd_24h_change: f64,
}

pub struct CoinGeckoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self {
            client: create_http_client().unwrap(),
            base_url: "https://api.coingecko.com/api/v3".to_string(),
        }
    }

    fn coin_id(symbol: &str) -> Option<&'static str> {
        COIN_IDS
            .iter()
            .find(|(sym, _)| *sym == symbol)
            .map(|(_, id)| *id)
    }

    fn symbol_for(coin_id: &str) -> Option<&'static str> {
        COIN_IDS
            .iter()
            .find(|(_, id)| *id == coin_id)
            .map(|(sym, _)| *sym)
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn fetch_quotes(&self, symbols: &[&str]) -> MarketResult<HashMap<String, Quote>> {
        let ids: Vec<&str> = symbols.iter().filter_map(|s| Self::coin_id(s)).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
            self.base_url,
            ids.join(",")
        );

        let response: HashMap<String, CoinPrice> =
            self.client.get(&url).send().await?.json().await?;

        let quotes: HashMap<String, Quote> = response
            .into_iter()
            .filter_map(|(coin_id, price)| {
                Self::symbol_for(&coin_id).map(|sym| {
                    (
                        sym.to_string(),
                        Quote {
                            price: price.usd,
                            change_24h: price.usd_24h_change,
                        },
                    )
                })
            })
            .collect();

        tracing::info!("Fetched {} quotes from CoinGecko", quotes.len());
        Ok(quotes)
    }
}
