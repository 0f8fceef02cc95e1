//! 模拟子信号源
//!
//! 成交量、相关性和表现评分暂时没有真实数据源，统一收在
//! 窄接口后面，替换为真实实现时指标公式不需要改动。

use crate::types::{AssetClass, AssetSpec, PerformanceScore, VolumeSignal, VolumeTrend};
use rand::Rng;
use std::collections::BTreeMap;

/// 成交量信号源
pub trait VolumeSource: Send + Sync {
    fn volume_for(&self, sentiment: i32) -> VolumeSignal;
}

/// 占位实现：固定区间抽样，极端情绪向上偏置
pub struct MockVolumeSource;

impl VolumeSource for MockVolumeSource {
    fn volume_for(&self, sentiment: i32) -> VolumeSignal {
        let mut rng = rand::thread_rng();
        let mut multiplier: f64 = rng.gen_range(0.5..=1.5);

        // 强烈看多和强烈看空都会放大成交量
        if sentiment >= 65 || sentiment <= 35 {
            multiplier += 0.3;
        }

        let score = ((multiplier * 60.0).round() as u32).min(100);

        VolumeSignal {
            trend: VolumeTrend::from_multiplier(multiplier),
            score,
        }
    }
}

/// 相关性信号源
pub trait CorrelationSource: Send + Sync {
    fn pairwise(&self, assets: &[AssetSpec]) -> BTreeMap<String, f64>;
}

/// 占位实现：按资产类别组合在固定区间内抽样，
/// 不是由真实价格历史推导的相关系数。
pub struct MockCorrelationSource;

impl CorrelationSource for MockCorrelationSource {
    fn pairwise(&self, assets: &[AssetSpec]) -> BTreeMap<String, f64> {
        let mut rng = rand::thread_rng();
        let mut correlations = BTreeMap::new();

        for i in 0..assets.len() {
            for j in (i + 1)..assets.len() {
                let (a, b) = (&assets[i], &assets[j]);

                let value: f64 = match (a.class, b.class) {
                    (AssetClass::Crypto, AssetClass::Crypto) => rng.gen_range(0.6..=0.9),
                    (AssetClass::Equity, AssetClass::Equity) => rng.gen_range(0.4..=0.8),
                    _ => rng.gen_range(0.1..=0.5),
                };

                correlations.insert(
                    format!("{}-{}", a.symbol, b.symbol),
                    (value * 100.0).round() / 100.0,
                );
            }
        }

        correlations
    }
}

/// 表现评分源
pub trait PerformanceSource: Send + Sync {
    fn assess(&self, avg_confidence: f64, active_sources: usize) -> PerformanceScore;
}

/// 占位实现：没有真实回测，预测准确率为模拟值，
/// 信号可靠性取自平均置信度，数据质量看活跃源数量。
pub struct MockPerformanceSource;

impl PerformanceSource for MockPerformanceSource {
    fn assess(&self, avg_confidence: f64, active_sources: usize) -> PerformanceScore {
        let mut rng = rand::thread_rng();

        let prediction_accuracy = round1(rng.gen_range(60.0..=85.0));
        let signal_reliability = round1((avg_confidence * 100.0).clamp(0.0, 100.0));
        let data_quality = ((active_sources * 20).min(100)) as f64;
        let composite = round1(
            prediction_accuracy * 0.4 + signal_reliability * 0.3 + data_quality * 0.3,
        );

        PerformanceScore {
            prediction_accuracy,
            signal_reliability,
            data_quality,
            composite,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
