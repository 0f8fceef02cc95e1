//! 核心类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("新闻源错误: {0}")]
    News(#[from] news::NewsError),

    #[error("行情源错误: {0}")]
    Market(#[from] market::MarketError),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 资产类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Crypto,
    Equity,
}

/// 受跟踪的资产
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSpec {
    pub symbol: String,
    pub class: AssetClass,
}

impl AssetSpec {
    pub fn new(symbol: &str, class: AssetClass) -> Self {
        Self {
            symbol: symbol.to_string(),
            class,
        }
    }
}

/// 单条标题的打分结果（临时值，不落盘）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredHeadline {
    /// 情绪分数 [10, 90]，50 为中性
    pub score: i32,
    /// 置信度 [0, 1]
    pub confidence: f64,
    /// 看多加权和
    pub bullish_score: f64,
    /// 看空加权和
    pub bearish_score: f64,
    /// 命中的关键词（最多 10 个，被否定反转的带 not_ 前缀）
    pub matched_keywords: Vec<String>,
}

impl ScoredHeadline {
    /// 固定中性结果
    pub fn neutral(confidence: f64) -> Self {
        Self {
            score: 50,
            confidence,
            bullish_score: 0.0,
            bearish_score: 0.0,
            matched_keywords: Vec::new(),
        }
    }
}

/// 情绪趋势
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    SlightlyBullish,
    Neutral,
    SlightlyBearish,
    Bearish,
}

impl Trend {
    /// 分数到趋势的阶跃函数，按顺序首个命中生效
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 58 => Trend::Bullish,
            s if s >= 52 => Trend::SlightlyBullish,
            s if s <= 42 => Trend::Bearish,
            s if s <= 48 => Trend::SlightlyBearish,
            _ => Trend::Neutral,
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::SlightlyBullish => write!(f, "slightly_bullish"),
            Trend::Neutral => write!(f, "neutral"),
            Trend::SlightlyBearish => write!(f, "slightly_bearish"),
            Trend::Bearish => write!(f, "bearish"),
        }
    }
}

/// 成交量趋势
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    High,
    Normal,
    Low,
}

impl VolumeTrend {
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier >= 1.3 {
            VolumeTrend::High
        } else if multiplier <= 0.7 {
            VolumeTrend::Low
        } else {
            VolumeTrend::Normal
        }
    }
}

/// 成交量信号
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeSignal {
    pub trend: VolumeTrend,
    /// [0, 100]
    pub score: u32,
}

/// 趋势强度标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthLabel {
    Weak,
    Moderate,
    Strong,
}

impl StrengthLabel {
    pub fn from_value(value: u32) -> Self {
        match value {
            v if v < 30 => StrengthLabel::Weak,
            v if v < 60 => StrengthLabel::Moderate,
            _ => StrengthLabel::Strong,
        }
    }
}

/// 动量标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MomentumLabel {
    #[serde(rename = "Strong Down")]
    StrongDown,
    Down,
    Neutral,
    Up,
    #[serde(rename = "Strong Up")]
    StrongUp,
}

impl MomentumLabel {
    pub fn from_value(value: u32) -> Self {
        match value {
            v if v < 25 => MomentumLabel::StrongDown,
            v if v < 45 => MomentumLabel::Down,
            v if v < 55 => MomentumLabel::Neutral,
            v if v < 75 => MomentumLabel::Up,
            _ => MomentumLabel::StrongUp,
        }
    }
}

/// 价格目标区间
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceTargets {
    pub bull_case: f64,
    pub base_case: f64,
    pub bear_case: f64,
}

/// 单个资产的完整情绪档案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetBundle {
    pub symbol: String,
    /// 情绪分数 [10, 90]
    pub sentiment: i32,
    pub trend: Trend,
    /// 置信度 [0, 1]
    pub confidence: f64,
    pub headlines_analyzed: usize,
    /// 参与分析的来源（排序去重）
    pub sources: Vec<String>,
    /// 出现频次最高的关键词（最多 5 个）
    pub matched_keywords: Vec<String>,
    pub volume_trend: VolumeTrend,
    /// [0, 100]
    pub volume_score: u32,
    pub price: f64,
    /// 24 小时涨跌幅（百分比）
    pub price_change_24h: f64,
    pub price_targets: PriceTargets,
    /// [0, 100]
    pub trend_strength: u32,
    pub trend_strength_label: StrengthLabel,
    /// [0, 100]
    pub momentum_score: u32,
    pub momentum_label: MomentumLabel,
}

/// 恐惧贪婪标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FearGreedLabel {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    #[serde(rename = "Extreme Greed")]
    ExtremeGreed,
}

/// 恐惧贪婪指数
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FearGreedIndex {
    /// [0, 100]
    pub value: u32,
    pub label: FearGreedLabel,
}

/// 交易信号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

/// 信号汇总
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalSummary {
    pub signal: Signal,
    /// 加权混合值 [0, 100]
    pub value: u32,
    /// [0, 100]
    pub confidence: u32,
}

/// 市场状态分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketRegime {
    Bull,
    Bear,
    #[serde(rename = "Range-bound")]
    RangeBound,
    Transition,
}

/// 市场状态评估
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeAssessment {
    pub regime: MarketRegime,
    pub bullish_assets: usize,
    pub bearish_assets: usize,
}

/// 风险等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

/// 风险评估
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// [0, 100]
    pub value: u32,
    pub level: RiskLevel,
}

/// 波动等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityLevel {
    Calm,
    Normal,
    Elevated,
    High,
}

/// 波动指数
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolatilityIndex {
    /// [0, 100]
    pub value: u32,
    pub level: VolatilityLevel,
}

/// 板块情绪
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorAnalysis {
    pub technology: u32,
    pub crypto: u32,
    pub leading: String,
}

/// 操作建议
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub symbol: String,
    pub reason: String,
}

/// 告警优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Medium,
    Low,
}

/// 触发的告警
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertTrigger {
    pub symbol: String,
    pub message: String,
    pub priority: AlertPriority,
}

/// 静态支撑/阻力位
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlertLevels {
    pub support: f64,
    pub resistance: f64,
}

/// 模拟的预测表现评分（占位，无真实回测数据）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub prediction_accuracy: f64,
    pub signal_reliability: f64,
    pub data_quality: f64,
    pub composite: f64,
}

/// 与上一次快照的对比
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalComparison {
    pub previous_sentiment: Option<i32>,
    pub change: i32,
    pub direction: String,
}

/// 整体情绪
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overall {
    pub sentiment: i32,
    pub label: String,
}

/// 快照中保留的头条
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopHeadline {
    pub title: String,
    pub source: String,
    pub score: i32,
}

/// 快照元信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub sources: Vec<String>,
    pub assets: Vec<String>,
}

/// 单次运行产出的市场情绪快照
///
/// 构建完成后不可变，整体替换上一份落盘文件。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub timestamp: DateTime<Utc>,
    pub market_status: String,
    pub source: String,
    pub assets: BTreeMap<String, AssetBundle>,
    /// 静态支撑/阻力阈值表
    pub alerts: BTreeMap<String, AlertLevels>,
    pub fear_greed_index: FearGreedIndex,
    pub signal_summary: SignalSummary,
    pub market_regime: RegimeAssessment,
    pub correlations: BTreeMap<String, f64>,
    pub risk_assessment: RiskAssessment,
    pub volatility_index: VolatilityIndex,
    pub alert_triggers: Vec<AlertTrigger>,
    pub sector_analysis: SectorAnalysis,
    pub historical_comparison: HistoricalComparison,
    pub performance_score: PerformanceScore,
    pub overall: Overall,
    pub metadata: SnapshotMetadata,
    pub themes: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub top_headlines: Vec<TopHeadline>,
    pub headlines_fetched: usize,
    pub sources_active: usize,
    pub engine_version: String,
}

/// 引擎配置
///
/// 进程启动时构建一次，之后只读注入各组件。
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 跟踪的资产列表
    pub assets: Vec<AssetSpec>,
    /// 快照输出路径
    pub output_path: PathBuf,
    /// 每个源抓取的标题上限
    pub headline_limit_per_source: usize,
    /// 每个资产参与打分的标题上限
    pub max_headlines_per_asset: usize,
    /// 无相关标题时的兜底基准分
    pub base_scores: BTreeMap<String, i32>,
    /// 静态支撑/阻力位
    pub alert_levels: BTreeMap<String, AlertLevels>,
    /// 引擎版本号（写入快照）
    pub engine_version: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let base_scores = BTreeMap::from([
            ("AAPL".to_string(), 70),
            ("NVDA".to_string(), 80),
            ("BTC".to_string(), 65),
            ("ETH".to_string(), 60),
        ]);

        let alert_levels = BTreeMap::from([
            (
                "BTC".to_string(),
                AlertLevels {
                    support: 58000.0,
                    resistance: 72000.0,
                },
            ),
            (
                "ETH".to_string(),
                AlertLevels {
                    support: 2800.0,
                    resistance: 3800.0,
                },
            ),
            (
                "AAPL".to_string(),
                AlertLevels {
                    support: 170.0,
                    resistance: 210.0,
                },
            ),
            (
                "NVDA".to_string(),
                AlertLevels {
                    support: 110.0,
                    resistance: 150.0,
                },
            ),
        ]);

        Self {
            assets: vec![
                AssetSpec::new("BTC", AssetClass::Crypto),
                AssetSpec::new("ETH", AssetClass::Crypto),
                AssetSpec::new("AAPL", AssetClass::Equity),
                AssetSpec::new("NVDA", AssetClass::Equity),
            ],
            output_path: PathBuf::from("data/sentiment.json"),
            headline_limit_per_source: 20,
            max_headlines_per_asset: 15,
            base_scores,
            alert_levels,
            engine_version: "2.0.0".to_string(),
        }
    }
}
