//! 单次运行入口：抓新闻、算指标、写快照

use engine::{EngineConfig, SnapshotBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = EngineConfig::default();
    let output_path = config.output_path.clone();
    let builder = SnapshotBuilder::new(config);

    let snapshot = builder.run().await?;

    println!("快照已写入 {}", output_path.display());
    println!(
        "  整体情绪: {} ({})",
        snapshot.overall.sentiment, snapshot.overall.label
    );
    println!("  恐惧贪婪指数: {}", snapshot.fear_greed_index.value);
    for (symbol, bundle) in &snapshot.assets {
        println!(
            "  {}: {} ({}), 24h {:+.2}%",
            symbol, bundle.sentiment, bundle.trend, bundle.price_change_24h
        );
    }
    println!("  主题: {}", snapshot.themes.join(", "));
    println!(
        "  标题 {} 条 / 活跃源 {} 个",
        snapshot.headlines_fetched, snapshot.sources_active
    );

    Ok(())
}
