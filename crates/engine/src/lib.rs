//! # Engine - 市场情绪快照引擎
//!
//! 把新闻标题打分聚合成一份市场情绪快照
//!
//! ## 主要模块
//!
//! - `lexicon`: 加权关键词打分（否定、程度、时近衰减）
//! - `aggregate`: 按资产筛选、去重、加权聚合
//! - `indicators`: 恐惧贪婪、信号、市场状态等市场级指标
//! - `advice`: 操作建议、告警、主题与头条
//! - `mock`: 成交量/相关性/表现评分的占位数据源
//! - `snapshot`: 管道编排与快照组装
//! - `storage`: JSON 快照落盘
//!
//! 单个新闻源或报价源失败只会降级，完整快照总能产出；
//! 唯一的硬错误是快照写盘失败。

pub mod advice;
pub mod aggregate;
pub mod indicators;
pub mod lexicon;
pub mod mock;
pub mod snapshot;
pub mod storage;
pub mod types;

pub use snapshot::SnapshotBuilder;
pub use storage::SnapshotStore;
pub use types::{
    AssetBundle, AssetClass, AssetSpec, EngineConfig, EngineError, EngineResult, MarketSnapshot,
    ScoredHeadline, Trend,
};
