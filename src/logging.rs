use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;

/// 按合并后的配置初始化日志，RUST_LOG优先于默认级别
pub fn init(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn default_directive(config: &Config) -> &'static str {
    if config.verbose { "debug" } else { "info" }
}
