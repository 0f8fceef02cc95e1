//! 快照构建管道
//!
//! 并发抓取全部新闻源与报价，按资产聚合情绪，算出市场级
//! 指标后组装成一份完整快照。到达顺序不影响结果：合并后
//! 的标题池先做确定性排序再进入聚合。

use crate::advice;
use crate::aggregate::AssetAggregator;
use crate::indicators;
use crate::lexicon::LexiconScorer;
use crate::mock::{
    CorrelationSource, MockCorrelationSource, MockPerformanceSource, MockVolumeSource,
    PerformanceSource, VolumeSource,
};
use crate::storage::SnapshotStore;
use crate::types::{
    AssetBundle, EngineConfig, EngineResult, HistoricalComparison, MarketSnapshot,
    MomentumLabel, Overall, PriceTargets, ScoredHeadline, SnapshotMetadata, StrengthLabel,
};
use chrono::{DateTime, Datelike, Timelike, Utc};
use futures::future::join_all;
use market::coingecko::CoinGeckoProvider;
use market::statics::StaticQuoteProvider;
use market::{PriceProvider, Quote};
use news::{Headline, HeadlineSource};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 快照构建器
pub struct SnapshotBuilder {
    config: EngineConfig,
    sources: Vec<Box<dyn HeadlineSource>>,
    price_provider: Box<dyn PriceProvider>,
    volume_source: Box<dyn VolumeSource>,
    correlation_source: Box<dyn CorrelationSource>,
    performance_source: Box<dyn PerformanceSource>,
}

impl SnapshotBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            sources: news::default_sources(),
            price_provider: Box::new(CoinGeckoProvider::new()),
            volume_source: Box::new(MockVolumeSource),
            correlation_source: Box::new(MockCorrelationSource),
            performance_source: Box::new(MockPerformanceSource),
            config,
        }
    }

    pub fn with_sources(mut self, sources: Vec<Box<dyn HeadlineSource>>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_price_provider(mut self, provider: Box<dyn PriceProvider>) -> Self {
        self.price_provider = provider;
        self
    }

    pub fn with_volume_source(mut self, source: Box<dyn VolumeSource>) -> Self {
        self.volume_source = source;
        self
    }

    pub fn with_correlation_source(mut self, source: Box<dyn CorrelationSource>) -> Self {
        self.correlation_source = source;
        self
    }

    pub fn with_performance_source(mut self, source: Box<dyn PerformanceSource>) -> Self {
        self.performance_source = source;
        self
    }

    /// 并发抓取全部新闻源，单个源失败降级为空列表
    pub async fn fetch_headlines(&self) -> Vec<Headline> {
        let limit = self.config.headline_limit_per_source;

        let futures: Vec<_> = self
            .sources
            .iter()
            .map(|source| async move {
                match source.fetch_latest(limit).await {
                    Ok(headlines) => {
                        tracing::info!(
                            "Fetched {} headlines from {}",
                            headlines.len(),
                            source.name()
                        );
                        headlines
                    }
                    Err(e) => {
                        tracing::warn!("Failed to fetch from {}: {}", source.name(), e);
                        Vec::new()
                    }
                }
            })
            .collect();

        let mut all: Vec<Headline> = join_all(futures).await.into_iter().flatten().collect();

        // 与到达顺序无关的确定性排序
        all.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.title.cmp(&b.title))
        });
        all
    }

    /// 获取报价，失败或缺口退回静态兜底
    async fn fetch_quotes(&self) -> HashMap<String, Quote> {
        let symbols: Vec<&str> = self
            .config
            .assets
            .iter()
            .map(|a| a.symbol.as_str())
            .collect();

        let mut quotes = match self.price_provider.fetch_quotes(&symbols).await {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!(
                    "Price provider {} failed: {}",
                    self.price_provider.name(),
                    e
                );
                HashMap::new()
            }
        };

        for spec in &self.config.assets {
            if !quotes.contains_key(&spec.symbol) {
                if let Some(quote) = StaticQuoteProvider::quote_for(&spec.symbol) {
                    quotes.insert(spec.symbol.clone(), quote);
                }
            }
        }

        quotes
    }

    /// 组装一份完整快照
    pub async fn build(&self, previous: Option<&MarketSnapshot>) -> EngineResult<MarketSnapshot> {
        let now = Utc::now();

        let headlines = self.fetch_headlines().await;
        let quotes = self.fetch_quotes().await;

        let aggregator = AssetAggregator::new(&self.config);
        let mut assets: BTreeMap<String, AssetBundle> = BTreeMap::new();

        for spec in &self.config.assets {
            let core = aggregator.aggregate(&spec.symbol, &headlines, now);
            let quote = quotes.get(&spec.symbol).copied().unwrap_or(Quote {
                price: 0.0,
                change_24h: 0.0,
            });

            let volume = self.volume_source.volume_for(core.sentiment);
            let strength =
                indicators::trend_strength(core.confidence, volume.score, quote.change_24h);
            let momentum =
                indicators::momentum_score(core.sentiment, quote.change_24h, volume.trend);

            assets.insert(
                spec.symbol.clone(),
                AssetBundle {
                    symbol: spec.symbol.clone(),
                    sentiment: core.sentiment,
                    trend: core.trend,
                    confidence: core.confidence,
                    headlines_analyzed: core.headlines_analyzed,
                    sources: core.sources,
                    matched_keywords: core.matched_keywords,
                    volume_trend: volume.trend,
                    volume_score: volume.score,
                    price: quote.price,
                    price_change_24h: quote.change_24h,
                    price_targets: price_targets(quote.price, core.sentiment),
                    trend_strength: strength,
                    trend_strength_label: StrengthLabel::from_value(strength),
                    momentum_score: momentum,
                    momentum_label: MomentumLabel::from_value(momentum),
                },
            );
        }

        let overall_sentiment = if assets.is_empty() {
            50
        } else {
            (assets.values().map(|a| a.sentiment as f64).sum::<f64>() / assets.len() as f64)
                .round() as i32
        };
        let overall = Overall {
            sentiment: overall_sentiment,
            label: if overall_sentiment >= 50 {
                "Bullish".to_string()
            } else {
                "Bearish".to_string()
            },
        };

        let fear_greed = indicators::fear_greed(&assets, &self.config.assets, overall_sentiment);
        let avg_strength = indicators::avg_trend_strength(&assets);
        let signal = indicators::signal_summary(overall_sentiment, fear_greed.value, avg_strength);
        let regime = indicators::market_regime(&assets, overall_sentiment, avg_strength);
        let risk = indicators::risk_assessment(&assets, fear_greed.value, avg_strength);
        let volatility = indicators::volatility_index(&assets);
        let sectors = indicators::sector_analysis(&assets, &self.config.assets);
        let correlations = self.correlation_source.pairwise(&self.config.assets);

        let recommendations = advice::recommendations(&assets, signal.signal, &fear_greed);
        let alert_triggers =
            advice::alert_triggers(&assets, &self.config.alert_levels, &fear_greed);
        let themes = advice::extract_themes(&headlines);

        let scorer = LexiconScorer::new();
        let scored_pool: Vec<(&Headline, ScoredHeadline)> = headlines
            .iter()
            .map(|h| (h, scorer.score_at(&h.title, h.published_at, now)))
            .collect();
        let top_headlines = advice::top_headlines(&scored_pool);

        let active_sources: BTreeSet<String> =
            headlines.iter().map(|h| h.source.clone()).collect();
        let avg_confidence = if assets.is_empty() {
            0.0
        } else {
            assets.values().map(|a| a.confidence).sum::<f64>() / assets.len() as f64
        };
        let performance = self
            .performance_source
            .assess(avg_confidence, active_sources.len());

        Ok(MarketSnapshot {
            timestamp: now,
            market_status: market_status(now),
            source: "news-aggregator".to_string(),
            alerts: self.config.alert_levels.clone(),
            fear_greed_index: fear_greed,
            signal_summary: signal,
            market_regime: regime,
            correlations,
            risk_assessment: risk,
            volatility_index: volatility,
            alert_triggers,
            sector_analysis: sectors,
            historical_comparison: compare_with_previous(overall_sentiment, previous),
            performance_score: performance,
            overall,
            metadata: SnapshotMetadata {
                generated_at: now,
                engine_version: self.config.engine_version.clone(),
                sources: active_sources.iter().cloned().collect(),
                assets: self
                    .config
                    .assets
                    .iter()
                    .map(|a| a.symbol.clone())
                    .collect(),
            },
            themes,
            recommendations,
            top_headlines,
            headlines_fetched: headlines.len(),
            sources_active: active_sources.len(),
            engine_version: self.config.engine_version.clone(),
            assets,
        })
    }

    /// 完整跑一轮：读旧快照、构建、落盘
    pub async fn run(&self) -> EngineResult<MarketSnapshot> {
        let store = SnapshotStore::new(self.config.output_path.clone());
        let previous = store.load().await;

        let snapshot = self.build(previous.as_ref()).await?;
        store.save(&snapshot).await?;

        Ok(snapshot)
    }
}

/// 情绪驱动的价格目标区间
fn price_targets(price: f64, sentiment: i32) -> PriceTargets {
    let base_case = round_cents(price * (1.0 + (sentiment - 50) as f64 / 500.0));

    PriceTargets {
        bull_case: round_cents(base_case * 1.08),
        base_case,
        bear_case: round_cents(base_case * 0.92),
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 与上一份快照比较整体情绪
fn compare_with_previous(
    current: i32,
    previous: Option<&MarketSnapshot>,
) -> HistoricalComparison {
    match previous {
        Some(prev) => {
            let change = current - prev.overall.sentiment;
            let direction = if change > 2 {
                "improving"
            } else if change < -2 {
                "deteriorating"
            } else {
                "flat"
            };

            HistoricalComparison {
                previous_sentiment: Some(prev.overall.sentiment),
                change,
                direction: direction.to_string(),
            }
        }
        None => HistoricalComparison {
            previous_sentiment: None,
            change: 0,
            direction: "no_history".to_string(),
        },
    }
}

/// 美股常规时段（工作日 13:30-20:00 UTC）内为 open，
/// 其余时间加密市场仍在交易
fn market_status(now: DateTime<Utc>) -> String {
    let weekday = now.weekday().num_days_from_monday();
    let minutes = now.hour() * 60 + now.minute();

    if weekday < 5 && (810..1200).contains(&minutes) {
        "open".to_string()
    } else {
        "crypto-only".to_string()
    }
}
