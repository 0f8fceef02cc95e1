//! 按资产聚合
//!
//! 从全量标题池中筛出单个资产的相关标题，逐条打分后
//! 按时近与置信度加权合成该资产的情绪档案。

use crate::lexicon::{recency_weight, LexiconScorer};
use crate::types::{EngineConfig, Trend};
use chrono::{DateTime, Utc};
use news::{Headline, HeadlineCategory};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// 聚合后的资产情绪（价格与成交量由上层合并）
#[derive(Debug, Clone)]
pub struct AssetSentiment {
    pub sentiment: i32,
    pub trend: Trend,
    pub confidence: f64,
    pub headlines_analyzed: usize,
    pub sources: Vec<String>,
    pub matched_keywords: Vec<String>,
}

/// 资产情绪聚合器
pub struct AssetAggregator {
    scorer: LexiconScorer,
    base_scores: BTreeMap<String, i32>,
    max_headlines: usize,
}

impl AssetAggregator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scorer: LexiconScorer::new(),
            base_scores: config.base_scores.clone(),
            max_headlines: config.max_headlines_per_asset,
        }
    }

    /// 聚合单个资产的情绪
    pub fn aggregate(
        &self,
        symbol: &str,
        pool: &[Headline],
        now: DateTime<Utc>,
    ) -> AssetSentiment {
        let relevant = self.select_relevant(symbol, pool);
        let deduped = dedup_by_title_prefix(relevant);

        if deduped.is_empty() {
            // 无相关标题不是错误，退回该资产的基准分
            let base = self.base_scores.get(symbol).copied().unwrap_or(50);
            return AssetSentiment {
                sentiment: base,
                trend: Trend::from_score(base),
                confidence: 0.5,
                headlines_analyzed: 0,
                sources: Vec::new(),
                matched_keywords: Vec::new(),
            };
        }

        let selected: Vec<&Headline> = deduped.into_iter().take(self.max_headlines).collect();

        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        let mut confidence_sum = 0.0;
        let mut keyword_counts: HashMap<String, usize> = HashMap::new();
        let mut sources: BTreeSet<String> = BTreeSet::new();

        for headline in &selected {
            let scored = self.scorer.score_at(&headline.title, headline.published_at, now);

            let weight = recency_weight(headline.published_at, now) * scored.confidence;
            weighted_sum += scored.score as f64 * weight;
            weight_sum += weight;
            confidence_sum += scored.confidence;

            for keyword in &scored.matched_keywords {
                *keyword_counts.entry(keyword.clone()).or_insert(0) += 1;
            }
            sources.insert(headline.source.clone());
        }

        let sentiment = if weight_sum > 0.0 {
            (weighted_sum / weight_sum).round() as i32
        } else {
            50
        };

        let confidence =
            ((confidence_sum / selected.len() as f64) * 100.0).round() / 100.0;

        let mut ranked: Vec<(String, usize)> = keyword_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let matched_keywords = ranked.into_iter().take(5).map(|(kw, _)| kw).collect();

        AssetSentiment {
            sentiment,
            trend: Trend::from_score(sentiment),
            confidence,
            headlines_analyzed: selected.len(),
            sources: sources.into_iter().collect(),
            matched_keywords,
        }
    }

    /// 资产相关性筛选
    ///
    /// 加密资产按币种标签或币名匹配；股票按代码、公司名或
    /// 泛科技/AI 提及匹配。BTC 作为市场龙头额外附加前 5 条
    /// 泛加密标题。
    fn select_relevant<'a>(&self, symbol: &str, pool: &'a [Headline]) -> Vec<&'a Headline> {
        let mut relevant: Vec<&Headline> = pool
            .iter()
            .filter(|h| Self::matches(symbol, h))
            .collect();

        if symbol == "BTC" {
            relevant.extend(
                pool.iter()
                    .filter(|h| h.category == HeadlineCategory::Crypto)
                    .take(5),
            );
        }

        relevant
    }

    fn matches(symbol: &str, headline: &Headline) -> bool {
        let title = headline.title.to_lowercase();

        match symbol {
            "BTC" => {
                headline.category == HeadlineCategory::Crypto
                    && (headline.currencies.iter().any(|c| c == "BTC")
                        || title.contains("bitcoin")
                        || title.contains("btc"))
            }
            "ETH" => {
                headline.category == HeadlineCategory::Crypto
                    && (headline.currencies.iter().any(|c| c == "ETH")
                        || title.contains("ethereum")
                        || title.contains("eth"))
            }
            "AAPL" => {
                headline.category == HeadlineCategory::Aapl
                    || title.contains("aapl")
                    || title.contains("apple")
                    || title.contains("tech")
                    || mentions_word(&title, "ai")
            }
            "NVDA" => {
                headline.category == HeadlineCategory::Nvda
                    || title.contains("nvda")
                    || title.contains("nvidia")
                    || title.contains("tech")
                    || mentions_word(&title, "ai")
            }
            _ => false,
        }
    }
}

/// 按整词匹配，避免 "gains" 命中 "ai" 这类子串误报
pub(crate) fn mentions_word(title_lower: &str, word: &str) -> bool {
    title_lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|t| t == word)
}

/// 按小写标题前 50 字符去重，保留首次出现
fn dedup_by_title_prefix(headlines: Vec<&Headline>) -> Vec<&Headline> {
    let mut seen = HashSet::new();
    headlines
        .into_iter()
        .filter(|h| {
            let key: String = h.title.to_lowercase().chars().take(50).collect();
            seen.insert(key)
        })
        .collect()
}
