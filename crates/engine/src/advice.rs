//! 建议、告警与快照附注
//!
//! 操作建议固定三条，告警列表长度随触发条件变化。

use crate::aggregate::mentions_word;
use crate::types::{
    AlertLevels, AlertPriority, AlertTrigger, AssetBundle, FearGreedIndex, Recommendation,
    ScoredHeadline, Signal, TopHeadline,
};
use news::Headline;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// 主题关键词表
const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    ("AI", &["ai", "artificial intelligence", "machine learning", "gpt"]),
    ("Earnings", &["earnings", "revenue", "profit", "quarter"]),
    ("Fed", &["fed", "federal reserve", "interest rate", "inflation"]),
    ("Crypto", &["crypto", "bitcoin", "ethereum", "blockchain"]),
    ("Regulation", &["sec", "regulation", "compliance", "lawsuit"]),
    ("Tech", &["tech", "software", "chip", "semiconductor"]),
];

/// 提取当前热点主题（最多 4 个），空结果退回固定主题
pub fn extract_themes(headlines: &[Headline]) -> Vec<String> {
    let text = headlines
        .iter()
        .map(|h| h.title.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut themes: Vec<String> = THEME_KEYWORDS
        .iter()
        .filter(|(_, keywords)| {
            keywords.iter().any(|kw| {
                if kw.contains(' ') {
                    text.contains(kw)
                } else {
                    mentions_word(&text, kw)
                }
            })
        })
        .map(|(theme, _)| theme.to_string())
        .collect();

    themes.truncate(4);

    if themes.is_empty() {
        vec![
            "Markets".to_string(),
            "Trading".to_string(),
            "Analysis".to_string(),
        ]
    } else {
        themes
    }
}

/// 挑选快照保留的头条（最多 5 条）
///
/// 按偏离中性的程度乘以置信度排序，平分时按标题字典序。
pub fn top_headlines(scored: &[(&Headline, ScoredHeadline)]) -> Vec<TopHeadline> {
    let mut ranked: Vec<&(&Headline, ScoredHeadline)> = scored.iter().collect();
    ranked.sort_by(|a, b| {
        let weight_a = (a.1.score - 50).abs() as f64 * a.1.confidence;
        let weight_b = (b.1.score - 50).abs() as f64 * b.1.confidence;
        weight_b
            .partial_cmp(&weight_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.title.cmp(&b.0.title))
    });

    ranked
        .into_iter()
        .take(5)
        .map(|(headline, scored)| TopHeadline {
            title: headline.title.clone(),
            source: headline.source.clone(),
            score: scored.score,
        })
        .collect()
}

/// 生成固定三条操作建议
pub fn recommendations(
    assets: &BTreeMap<String, AssetBundle>,
    signal: Signal,
    fear_greed: &FearGreedIndex,
) -> Vec<Recommendation> {
    vec![
        signal_recommendation(assets, signal),
        fear_greed_recommendation(assets, fear_greed),
        divergence_recommendation(assets),
    ]
}

/// 第一条：跟随信号方向
fn signal_recommendation(assets: &BTreeMap<String, AssetBundle>, signal: Signal) -> Recommendation {
    match signal {
        Signal::StrongBuy | Signal::Buy => {
            // 超卖但动量转强的资产里挑最便宜的
            let candidate = assets
                .values()
                .filter(|a| a.sentiment <= 45 && a.momentum_score >= 55)
                .min_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));

            match candidate {
                Some(asset) => Recommendation {
                    action: "BUY".to_string(),
                    symbol: asset.symbol.clone(),
                    reason: format!(
                        "Oversold at sentiment {} while momentum is building",
                        asset.sentiment
                    ),
                },
                None => Recommendation {
                    action: "BUY".to_string(),
                    symbol: "BTC".to_string(),
                    reason: "Positive market signal; default to the market leader".to_string(),
                },
            }
        }
        Signal::Sell | Signal::StrongSell => {
            let candidate = assets
                .values()
                .filter(|a| a.sentiment >= 65)
                .max_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));

            match candidate {
                Some(asset) => Recommendation {
                    action: "SELL".to_string(),
                    symbol: asset.symbol.clone(),
                    reason: format!(
                        "Overbought at sentiment {} against a negative market signal",
                        asset.sentiment
                    ),
                },
                None => Recommendation {
                    action: "HOLD".to_string(),
                    symbol: "CASH".to_string(),
                    reason: "Negative signal without an overbought candidate; stay in cash"
                        .to_string(),
                },
            }
        }
        Signal::Hold => Recommendation {
            action: "HOLD".to_string(),
            symbol: "PORTFOLIO".to_string(),
            reason: "Mixed signals; wait for a clearer setup".to_string(),
        },
    }
}

/// 第二条：跟随恐惧贪婪极值
fn fear_greed_recommendation(
    assets: &BTreeMap<String, AssetBundle>,
    fear_greed: &FearGreedIndex,
) -> Recommendation {
    if fear_greed.value <= 30 {
        return Recommendation {
            action: "BUY".to_string(),
            symbol: "BTC".to_string(),
            reason: format!(
                "Fear & Greed at {}; extreme fear has historically preceded rebounds",
                fear_greed.value
            ),
        };
    }

    if fear_greed.value >= 75 {
        return Recommendation {
            action: "SELL".to_string(),
            symbol: "ETH".to_string(),
            reason: format!(
                "Fear & Greed at {}; extreme greed argues for taking profit",
                fear_greed.value
            ),
        };
    }

    match assets.values().max_by_key(|a| a.momentum_score) {
        Some(asset) if asset.momentum_score >= 55 => Recommendation {
            action: "ACCUMULATE".to_string(),
            symbol: asset.symbol.clone(),
            reason: format!("Strongest momentum ({}) among tracked assets", asset.momentum_score),
        },
        Some(asset) => Recommendation {
            action: "WATCH".to_string(),
            symbol: asset.symbol.clone(),
            reason: "Leads on momentum but lacks follow-through".to_string(),
        },
        None => Recommendation {
            action: "WATCH".to_string(),
            symbol: "BTC".to_string(),
            reason: "No asset data this run; monitor the market leader".to_string(),
        },
    }
}

/// 第三条：情绪与价格背离
fn divergence_recommendation(assets: &BTreeMap<String, AssetBundle>) -> Recommendation {
    if let Some(asset) = assets
        .values()
        .find(|a| a.sentiment >= 55 && a.price_change_24h < -2.0)
    {
        return Recommendation {
            action: "BUY".to_string(),
            symbol: asset.symbol.clone(),
            reason: format!(
                "Bullish sentiment with price down {:.1}%; potential dip",
                asset.price_change_24h.abs()
            ),
        };
    }

    if let Some(asset) = assets
        .values()
        .find(|a| a.sentiment <= 45 && a.price_change_24h > 2.0)
    {
        return Recommendation {
            action: "WATCH".to_string(),
            symbol: asset.symbol.clone(),
            reason: format!(
                "Price up {:.1}% against bearish sentiment; reversal risk",
                asset.price_change_24h
            ),
        };
    }

    Recommendation {
        action: "WATCH".to_string(),
        symbol: "NVDA".to_string(),
        reason: "No sentiment/price divergence; monitor the AI bellwether".to_string(),
    }
}

/// 依据静态阈值表、恐惧贪婪极值和日内波幅生成告警
pub fn alert_triggers(
    assets: &BTreeMap<String, AssetBundle>,
    levels: &BTreeMap<String, AlertLevels>,
    fear_greed: &FearGreedIndex,
) -> Vec<AlertTrigger> {
    let mut triggers = Vec::new();

    for (symbol, bundle) in assets {
        if let Some(level) = levels.get(symbol) {
            if bundle.price <= level.support {
                triggers.push(AlertTrigger {
                    symbol: symbol.clone(),
                    message: format!("Broke below support at {:.2}", level.support),
                    priority: AlertPriority::High,
                });
            } else if bundle.price <= level.support * 1.02 {
                triggers.push(AlertTrigger {
                    symbol: symbol.clone(),
                    message: format!("Approaching support at {:.2}", level.support),
                    priority: AlertPriority::Medium,
                });
            }

            if bundle.price >= level.resistance {
                triggers.push(AlertTrigger {
                    symbol: symbol.clone(),
                    message: format!("Broke above resistance at {:.2}", level.resistance),
                    priority: AlertPriority::Medium,
                });
            } else if bundle.price >= level.resistance * 0.98 {
                triggers.push(AlertTrigger {
                    symbol: symbol.clone(),
                    message: format!("Approaching resistance at {:.2}", level.resistance),
                    priority: AlertPriority::Low,
                });
            }
        }

        let swing = bundle.price_change_24h;
        if swing.abs() >= 5.0 {
            triggers.push(AlertTrigger {
                symbol: symbol.clone(),
                message: format!("{:+.1}% move in 24h", swing),
                priority: AlertPriority::High,
            });
        } else if swing.abs() >= 3.0 {
            triggers.push(AlertTrigger {
                symbol: symbol.clone(),
                message: format!("{:+.1}% move in 24h", swing),
                priority: AlertPriority::Medium,
            });
        }
    }

    if fear_greed.value <= 25 {
        triggers.push(AlertTrigger {
            symbol: "MARKET".to_string(),
            message: format!("Fear & Greed at {} (Extreme Fear)", fear_greed.value),
            priority: AlertPriority::High,
        });
    } else if fear_greed.value >= 75 {
        triggers.push(AlertTrigger {
            symbol: "MARKET".to_string(),
            message: format!("Fear & Greed at {} (Extreme Greed)", fear_greed.value),
            priority: AlertPriority::High,
        });
    }

    triggers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        FearGreedLabel, MomentumLabel, PriceTargets, StrengthLabel, Trend, VolumeTrend,
    };
    use chrono::Utc;
    use news::HeadlineCategory;

    fn bundle(symbol: &str, sentiment: i32, momentum: u32, price: f64, change: f64) -> AssetBundle {
        AssetBundle {
            symbol: symbol.to_string(),
            sentiment,
            trend: Trend::from_score(sentiment),
            confidence: 0.7,
            headlines_analyzed: 3,
            sources: Vec::new(),
            matched_keywords: Vec::new(),
            volume_trend: VolumeTrend::Normal,
            volume_score: 60,
            price,
            price_change_24h: change,
            price_targets: PriceTargets {
                bull_case: price * 1.08,
                base_case: price,
                bear_case: price * 0.92,
            },
            trend_strength: 50,
            trend_strength_label: StrengthLabel::Moderate,
            momentum_score: momentum,
            momentum_label: MomentumLabel::from_value(momentum),
        }
    }

    fn neutral_fg() -> FearGreedIndex {
        FearGreedIndex {
            value: 50,
            label: FearGreedLabel::Neutral,
        }
    }

    fn headline(title: &str) -> Headline {
        Headline {
            id: title.to_string(),
            title: title.to_string(),
            source: "CoinDesk".to_string(),
            category: HeadlineCategory::Crypto,
            url: String::new(),
            currencies: Vec::new(),
            published_at: None,
            fetched_at: Utc::now(),
        }
    }

    fn sample_assets() -> BTreeMap<String, AssetBundle> {
        BTreeMap::from([
            ("AAPL".to_string(), bundle("AAPL", 55, 50, 182.5, 0.4)),
            ("BTC".to_string(), bundle("BTC", 60, 60, 67500.0, 1.2)),
            ("ETH".to_string(), bundle("ETH", 50, 45, 3200.0, 0.8)),
            ("NVDA".to_string(), bundle("NVDA", 65, 70, 131.2, 1.1)),
        ])
    }

    #[test]
    fn test_always_exactly_three_recommendations() {
        let fg = neutral_fg();

        let full = recommendations(&sample_assets(), Signal::Hold, &fg);
        assert_eq!(full.len(), 3);

        let empty = recommendations(&BTreeMap::new(), Signal::StrongBuy, &fg);
        assert_eq!(empty.len(), 3);

        for signal in [
            Signal::StrongBuy,
            Signal::Buy,
            Signal::Hold,
            Signal::Sell,
            Signal::StrongSell,
        ] {
            assert_eq!(recommendations(&sample_assets(), signal, &fg).len(), 3);
        }
    }

    #[test]
    fn test_buy_signal_picks_cheapest_oversold_strengthening() {
        let mut assets = sample_assets();
        assets.insert("ETH".to_string(), bundle("ETH", 40, 60, 3200.0, -1.0));
        assets.insert("AAPL".to_string(), bundle("AAPL", 42, 58, 182.5, -0.5));

        let recs = recommendations(&assets, Signal::Buy, &neutral_fg());
        assert_eq!(recs[0].action, "BUY");
        // 两个候选里 AAPL 价格更低
        assert_eq!(recs[0].symbol, "AAPL");
    }

    #[test]
    fn test_buy_signal_defaults_to_btc() {
        let recs = recommendations(&sample_assets(), Signal::Buy, &neutral_fg());
        assert_eq!(recs[0].action, "BUY");
        assert_eq!(recs[0].symbol, "BTC");
    }

    #[test]
    fn test_sell_signal_picks_priciest_overbought_else_cash() {
        let recs = recommendations(&sample_assets(), Signal::Sell, &neutral_fg());
        // NVDA 是唯一 sentiment >= 65 的资产
        assert_eq!(recs[0].action, "SELL");
        assert_eq!(recs[0].symbol, "NVDA");

        let mut cooled = sample_assets();
        cooled.insert("NVDA".to_string(), bundle("NVDA", 55, 50, 131.2, 0.0));
        let recs = recommendations(&cooled, Signal::Sell, &neutral_fg());
        assert_eq!(recs[0].action, "HOLD");
        assert_eq!(recs[0].symbol, "CASH");
    }

    #[test]
    fn test_fear_greed_extremes_drive_second_recommendation() {
        let fear = FearGreedIndex {
            value: 22,
            label: FearGreedLabel::ExtremeFear,
        };
        let recs = recommendations(&sample_assets(), Signal::Hold, &fear);
        assert_eq!(recs[1].action, "BUY");
        assert_eq!(recs[1].symbol, "BTC");

        let greed = FearGreedIndex {
            value: 80,
            label: FearGreedLabel::ExtremeGreed,
        };
        let recs = recommendations(&sample_assets(), Signal::Hold, &greed);
        assert_eq!(recs[1].action, "SELL");
        assert_eq!(recs[1].symbol, "ETH");

        // 中间区间跟随最强动量资产
        let recs = recommendations(&sample_assets(), Signal::Hold, &neutral_fg());
        assert_eq!(recs[1].action, "ACCUMULATE");
        assert_eq!(recs[1].symbol, "NVDA");
    }

    #[test]
    fn test_divergence_recommendation() {
        let mut assets = sample_assets();
        assets.insert("BTC".to_string(), bundle("BTC", 62, 60, 67500.0, -3.5));

        let recs = recommendations(&assets, Signal::Hold, &neutral_fg());
        assert_eq!(recs[2].action, "BUY");
        assert_eq!(recs[2].symbol, "BTC");

        // 无背离时落到 NVDA 观察位
        let recs = recommendations(&sample_assets(), Signal::Hold, &neutral_fg());
        assert_eq!(recs[2].action, "WATCH");
        assert_eq!(recs[2].symbol, "NVDA");
    }

    #[test]
    fn test_alert_triggers_for_levels_and_swings() {
        let levels = BTreeMap::from([(
            "BTC".to_string(),
            AlertLevels {
                support: 58000.0,
                resistance: 72000.0,
            },
        )]);

        // 跌破支撑 + 大波幅
        let mut assets = BTreeMap::new();
        assets.insert("BTC".to_string(), bundle("BTC", 40, 30, 57000.0, -6.0));
        let triggers = alert_triggers(&assets, &levels, &neutral_fg());

        assert_eq!(triggers.len(), 2);
        assert!(triggers[0].message.contains("Broke below support"));
        assert_eq!(triggers[0].priority, AlertPriority::High);
        assert_eq!(triggers[1].priority, AlertPriority::High);

        // 接近支撑（2% 以内）
        let mut assets = BTreeMap::new();
        assets.insert("BTC".to_string(), bundle("BTC", 50, 50, 59000.0, 0.5));
        let triggers = alert_triggers(&assets, &levels, &neutral_fg());
        assert_eq!(triggers.len(), 1);
        assert!(triggers[0].message.contains("Approaching support"));
        assert_eq!(triggers[0].priority, AlertPriority::Medium);

        // 中等波幅
        let mut assets = BTreeMap::new();
        assets.insert("BTC".to_string(), bundle("BTC", 50, 50, 65000.0, 3.5));
        let triggers = alert_triggers(&assets, &levels, &neutral_fg());
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].priority, AlertPriority::Medium);
    }

    #[test]
    fn test_fear_greed_band_alerts() {
        let fear = FearGreedIndex {
            value: 20,
            label: FearGreedLabel::ExtremeFear,
        };
        let triggers = alert_triggers(&BTreeMap::new(), &BTreeMap::new(), &fear);
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].symbol, "MARKET");
        assert!(triggers[0].message.contains("Extreme Fear"));

        let calm = alert_triggers(&BTreeMap::new(), &BTreeMap::new(), &neutral_fg());
        assert!(calm.is_empty());
    }

    #[test]
    fn test_theme_extraction_and_fallback() {
        let pool = vec![
            headline("Fed holds interest rate steady"),
            headline("Bitcoin rally extends as ethereum follows"),
            headline("AI chip demand lifts semiconductor outlook"),
            headline("SEC opens review of exchange compliance"),
            headline("Quarterly earnings beat expectations"),
        ];

        let themes = extract_themes(&pool);
        assert!(themes.len() <= 4);
        assert!(themes.contains(&"Fed".to_string()));
        assert!(themes.contains(&"Crypto".to_string()));
        assert!(themes.contains(&"AI".to_string()));

        let fallback = extract_themes(&[headline("Quiet session in global indexes")]);
        assert_eq!(fallback, vec!["Markets", "Trading", "Analysis"]);
    }

    #[test]
    fn test_theme_word_matching_avoids_substrings() {
        // "gains" 不应命中 AI 主题
        let themes = extract_themes(&[headline("Utility gains on dividend news")]);
        assert!(!themes.contains(&"AI".to_string()));
    }

    #[test]
    fn test_top_headlines_ranked_and_capped() {
        let pool: Vec<Headline> = (0..7)
            .map(|i| headline(&format!("headline {}", i)))
            .collect();

        let scored: Vec<(&Headline, ScoredHeadline)> = pool
            .iter()
            .enumerate()
            .map(|(i, h)| {
                (
                    h,
                    ScoredHeadline {
                        score: 50 + (i as i32) * 5,
                        confidence: 0.6,
                        bullish_score: 1.0,
                        bearish_score: 0.0,
                        matched_keywords: Vec::new(),
                    },
                )
            })
            .collect();

        let top = top_headlines(&scored);
        assert_eq!(top.len(), 5);
        // 偏离中性最远的排第一
        assert_eq!(top[0].score, 80);
        assert!(top.iter().all(|t| t.score >= 55));
    }
}
