use anyhow::Result;
use clap::Parser;
use research_assistant::{cli, launch, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 不存在时忽略
    let _ = dotenvy::dotenv();

    let args = cli::Args::parse();
    let mode = args.run_mode();
    let config = args.into_config()?;

    // 配置文件中的verbose同样生效
    logging::init(&config)?;

    launch(&config, mode).await
}
