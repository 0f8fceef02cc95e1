//! 市场级指标
//!
//! 全部是无共享状态的纯函数，输入为各资产档案与价格数据，
//! 便于逐个单测。

use crate::types::{
    AssetBundle, AssetClass, AssetSpec, FearGreedIndex, FearGreedLabel, MarketRegime,
    RegimeAssessment, RiskAssessment, RiskLevel, SectorAnalysis, Signal, SignalSummary,
    VolatilityIndex, VolatilityLevel, VolumeTrend,
};
use std::collections::BTreeMap;

/// 趋势强度 [0, 100]
pub fn trend_strength(confidence: f64, volume_score: u32, price_change: f64) -> u32 {
    let value = confidence * 100.0 * 0.5
        + volume_score as f64 * 0.3
        + (price_change.abs() * 10.0).min(100.0) * 0.2;
    value.clamp(0.0, 100.0).round() as u32
}

/// 动量分数 [0, 100]
pub fn momentum_score(sentiment: i32, price_change: f64, volume_trend: VolumeTrend) -> u32 {
    let price_component = (50.0 + price_change * 5.0).clamp(0.0, 100.0);
    let volume_component = match volume_trend {
        VolumeTrend::High => 100.0,
        VolumeTrend::Normal => 50.0,
        VolumeTrend::Low => 30.0,
    };

    let value = price_component * 0.5 + sentiment as f64 * 0.3 + volume_component * 0.2;
    value.clamp(0.0, 100.0).round() as u32
}

/// 全资产平均 24h 涨跌幅
pub fn avg_price_change(assets: &BTreeMap<String, AssetBundle>) -> f64 {
    if assets.is_empty() {
        return 0.0;
    }
    assets.values().map(|a| a.price_change_24h).sum::<f64>() / assets.len() as f64
}

/// 全资产平均趋势强度
pub fn avg_trend_strength(assets: &BTreeMap<String, AssetBundle>) -> f64 {
    if assets.is_empty() {
        return 0.0;
    }
    assets.values().map(|a| a.trend_strength as f64).sum::<f64>() / assets.len() as f64
}

/// 恐惧贪婪标签，按顺序首个命中生效（25 归入 Extreme Fear）
pub fn fear_greed_label(value: u32) -> FearGreedLabel {
    match value {
        v if v <= 25 => FearGreedLabel::ExtremeFear,
        v if v <= 45 => FearGreedLabel::Fear,
        v if v <= 55 => FearGreedLabel::Neutral,
        v if v <= 75 => FearGreedLabel::Greed,
        _ => FearGreedLabel::ExtremeGreed,
    }
}

/// 恐惧贪婪指数
///
/// 整体情绪 40% + 平均涨跌幅映射 30% + 加密加权情绪 30%。
pub fn fear_greed(
    assets: &BTreeMap<String, AssetBundle>,
    specs: &[AssetSpec],
    overall_sentiment: i32,
) -> FearGreedIndex {
    let momentum_leg = (50.0 + avg_price_change(assets) * 5.0).clamp(0.0, 100.0);

    // 加密资产权重 1.5，股票 1.0
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for spec in specs {
        if let Some(bundle) = assets.get(&spec.symbol) {
            let weight = match spec.class {
                AssetClass::Crypto => 1.5,
                AssetClass::Equity => 1.0,
            };
            weighted_sum += bundle.sentiment as f64 * weight;
            weight_sum += weight;
        }
    }
    let weighted_leg = if weight_sum > 0.0 {
        weighted_sum / weight_sum
    } else {
        50.0
    };

    let value = (overall_sentiment as f64 * 0.4 + momentum_leg * 0.3 + weighted_leg * 0.3)
        .clamp(0.0, 100.0)
        .round() as u32;

    FearGreedIndex {
        value,
        label: fear_greed_label(value),
    }
}

/// 信号汇总
///
/// 整体情绪 30% + 恐惧贪婪 30% + 平均趋势强度 40%。
pub fn signal_summary(
    overall_sentiment: i32,
    fear_greed_value: u32,
    avg_strength: f64,
) -> SignalSummary {
    let value = overall_sentiment as f64 * 0.3 + fear_greed_value as f64 * 0.3 + avg_strength * 0.4;

    let signal = match value {
        v if v >= 75.0 => Signal::StrongBuy,
        v if v >= 60.0 => Signal::Buy,
        v if v >= 40.0 => Signal::Hold,
        v if v >= 25.0 => Signal::Sell,
        _ => Signal::StrongSell,
    };

    let mut confidence = ((value - 50.0).abs() * 2.0).min(90.0);
    // 趋势强度同向确认加分
    if avg_strength >= 60.0 && (value - 50.0).abs() >= 10.0 {
        confidence += 15.0;
    }
    // 情绪与恐惧贪婪指向相反则减分
    if (overall_sentiment as f64 - 50.0) * (fear_greed_value as f64 - 50.0) < 0.0 {
        confidence -= 20.0;
    }

    SignalSummary {
        signal,
        value: value.clamp(0.0, 100.0).round() as u32,
        confidence: confidence.clamp(0.0, 100.0).round() as u32,
    }
}

/// 市场状态分类
///
/// 多空资产数接近且两边都有时判定为转换期，优先于其余分支。
pub fn market_regime(
    assets: &BTreeMap<String, AssetBundle>,
    overall_sentiment: i32,
    avg_strength: f64,
) -> RegimeAssessment {
    let bullish_assets = assets.values().filter(|a| a.sentiment > 55).count();
    let bearish_assets = assets.values().filter(|a| a.sentiment < 45).count();

    let conflicting = bullish_assets > 0
        && bearish_assets > 0
        && (bullish_assets as i32 - bearish_assets as i32).abs() <= 1;

    let regime = if conflicting {
        MarketRegime::Transition
    } else if bullish_assets > bearish_assets && overall_sentiment > 55 && avg_strength >= 50.0 {
        MarketRegime::Bull
    } else if bearish_assets > bullish_assets && overall_sentiment < 45 && avg_strength >= 50.0 {
        MarketRegime::Bear
    } else if avg_strength < 50.0 && (42..=58).contains(&overall_sentiment) {
        MarketRegime::RangeBound
    } else {
        MarketRegime::Transition
    };

    RegimeAssessment {
        regime,
        bullish_assets,
        bearish_assets,
    }
}

/// 风险评估
///
/// 平均波幅 40% + 恐惧贪婪偏离中性 30% + 趋势弱度 30%。
pub fn risk_assessment(
    assets: &BTreeMap<String, AssetBundle>,
    fear_greed_value: u32,
    avg_strength: f64,
) -> RiskAssessment {
    let avg_abs_change = if assets.is_empty() {
        0.0
    } else {
        assets.values().map(|a| a.price_change_24h.abs()).sum::<f64>() / assets.len() as f64
    };

    let value = (avg_abs_change * 10.0).min(100.0) * 0.4
        + (fear_greed_value as f64 - 50.0).abs() * 2.0 * 0.3
        + (100.0 - avg_strength) * 0.3;
    let value = value.clamp(0.0, 100.0).round() as u32;

    let level = match value {
        v if v < 30 => RiskLevel::Low,
        v if v < 50 => RiskLevel::Medium,
        v if v < 70 => RiskLevel::High,
        _ => RiskLevel::Extreme,
    };

    RiskAssessment { value, level }
}

/// 波动指数
///
/// 平均波幅 40% + 跨资产情绪离散度 30% + 平均成交量分数 30%。
pub fn volatility_index(assets: &BTreeMap<String, AssetBundle>) -> VolatilityIndex {
    let (avg_abs_change, spread, avg_volume) = if assets.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let abs_change =
            assets.values().map(|a| a.price_change_24h.abs()).sum::<f64>() / assets.len() as f64;
        let max = assets.values().map(|a| a.sentiment).max().unwrap_or(50);
        let min = assets.values().map(|a| a.sentiment).min().unwrap_or(50);
        let volume =
            assets.values().map(|a| a.volume_score as f64).sum::<f64>() / assets.len() as f64;
        (abs_change, (max - min) as f64, volume)
    };

    let value = (avg_abs_change * 10.0).min(100.0) * 0.4 + spread * 0.3 + avg_volume * 0.3;
    let value = value.clamp(0.0, 100.0).round() as u32;

    let level = match value {
        v if v < 25 => VolatilityLevel::Calm,
        v if v < 50 => VolatilityLevel::Normal,
        v if v < 70 => VolatilityLevel::Elevated,
        _ => VolatilityLevel::High,
    };

    VolatilityIndex { value, level }
}

/// 板块情绪：科技为股票均值，加密为币种均值，
/// 领先板块需要 5 分以上的差距
pub fn sector_analysis(
    assets: &BTreeMap<String, AssetBundle>,
    specs: &[AssetSpec],
) -> SectorAnalysis {
    let mean_for = |class: AssetClass| -> f64 {
        let scores: Vec<i32> = specs
            .iter()
            .filter(|s| s.class == class)
            .filter_map(|s| assets.get(&s.symbol).map(|a| a.sentiment))
            .collect();
        if scores.is_empty() {
            50.0
        } else {
            scores.iter().sum::<i32>() as f64 / scores.len() as f64
        }
    };

    let technology = mean_for(AssetClass::Equity).round() as u32;
    let crypto = mean_for(AssetClass::Crypto).round() as u32;

    let leading = if technology as i32 - crypto as i32 > 5 {
        "Technology".to_string()
    } else if crypto as i32 - technology as i32 > 5 {
        "Crypto".to_string()
    } else {
        "Neutral".to_string()
    };

    SectorAnalysis {
        technology,
        crypto,
        leading,
    }
}
