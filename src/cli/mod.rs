use crate::config::{Config, LLMProvider};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "research-assistant.toml";

/// Research Assistant - 多智能体调研助手
#[derive(Parser, Debug)]
#[command(name = "research-assistant")]
#[command(
    about = "Multi-agent research assistant: plans a topic, researches it and compiles a markdown report, served as a web page or run once in the terminal."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// HTTP服务监听地址
    #[arg(short, long)]
    pub bind: Option<String>,

    /// LLM Provider (azure, openai)
    #[arg(long)]
    pub provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub api_key: Option<String>,

    /// Azure资源endpoint或OpenAI API基地址
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Azure部署名称（OpenAI下为模型名称）
    #[arg(long)]
    pub deployment: Option<String>,

    /// Azure API版本
    #[arg(long)]
    pub api_version: Option<String>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 单个Agent运行的最大轮数
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 不启动服务，直接在终端调研该主题
    #[arg(short, long)]
    pub topic: Option<String>,

    /// 终端模式下报告的输出目录
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

/// 运行方式
#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    /// 启动HTTP服务
    Serve,
    /// 终端内执行一次调研并保存报告
    Headless { topic: String, output_dir: PathBuf },
}

impl Args {
    pub fn run_mode(&self) -> RunMode {
        match &self.topic {
            Some(topic) => RunMode::Headless {
                topic: topic.clone(),
                output_dir: self.output_dir.clone(),
            },
            None => RunMode::Serve,
        }
    }

    /// 将CLI参数转换为配置：配置文件 → 环境变量 → 命令行
    pub fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path).with_context(|| {
                        format!("无法读取默认配置文件 {:?}", default_config_path)
                    })?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_env();
        self.apply_overrides(&mut config)?;
        Ok(config)
    }

    fn apply_overrides(self, config: &mut Config) -> Result<()> {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(provider_str) = self.provider {
            config.llm.provider = provider_str
                .parse::<LLMProvider>()
                .map_err(|e| anyhow!(e))?;
        }
        if let Some(api_key) = self.api_key {
            config.llm.api_key = api_key;
        }
        if let Some(endpoint) = self.endpoint {
            config.llm.endpoint = endpoint;
        }
        if let Some(deployment) = self.deployment {
            config.llm.deployment = deployment;
        }
        if let Some(api_version) = self.api_version {
            config.llm.api_version = api_version;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = Some(temperature);
        }
        if let Some(max_turns) = self.max_turns {
            config.llm.max_turns = max_turns;
        }
        config.verbose = config.verbose || self.verbose;
        Ok(())
    }
}

// Include tests
#[cfg(test)]
mod tests;
