use anyhow::Result;
use quiz_engine::utils::logging;
use quiz_engine::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    let stats = App::initialize(config)?.run().await?;

    if stats.failed > 0 || stats.incomplete > 0 {
        tracing::warn!("⚠️ 有测验未通过或答题卡不完整，详见日志");
    }

    Ok(())
}
