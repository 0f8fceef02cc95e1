//! 快照落盘
//!
//! 每次运行产出一份 JSON 快照整体替换旧文件。读取旧快照
//! 只服务于历史对比，缺失或损坏都按无历史处理；写入失败
//! 是整个管道里唯一的硬错误。

use crate::types::{EngineResult, MarketSnapshot};
use std::path::{Path, PathBuf};

/// 快照存储
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取上一份快照
    pub async fn load(&self) -> Option<MarketSnapshot> {
        let raw = tokio::fs::read_to_string(&self.path).await.ok()?;

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Previous snapshot unreadable, ignoring: {}", e);
                None
            }
        }
    }

    /// 写入快照
    pub async fn save(&self, snapshot: &MarketSnapshot) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, json).await?;

        tracing::info!("Snapshot written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("sentiment.json"));

        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentiment.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let store = SnapshotStore::new(path);
        assert!(store.load().await.is_none());
    }
}
