use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// Azure OpenAI 相关的环境变量
pub const ENV_AZURE_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_AZURE_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_AZURE_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
pub const ENV_AZURE_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_EXA_API_KEY: &str = "EXA_API_KEY";
pub const ENV_BIND: &str = "RESEARCH_ASSISTANT_BIND";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "azure")]
    #[default]
    Azure,
    #[serde(rename = "openai")]
    OpenAI,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Azure => write!(f, "azure"),
            LLMProvider::OpenAI => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "azure" | "azure-openai" => Ok(LLMProvider::Azure),
            "openai" => Ok(LLMProvider::OpenAI),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 配置缺失或不合法
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("missing LLM setting `{field}` (set {env} or pass it on the command line)")]
    Missing {
        field: &'static str,
        env: &'static str,
    },
    #[error("`{field}` must be greater than zero")]
    NotPositive { field: &'static str },
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP服务配置
    pub server: ServerConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 网页搜索配置
    pub search: SearchConfig,

    /// 调研流程配置
    pub research: ResearchConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// HTTP服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind: String,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// 服务地址，Azure为资源endpoint，OpenAI为API基地址
    pub endpoint: String,

    /// Azure部署名称；OpenAI provider下作为模型名称使用
    pub deployment: String,

    /// Azure API版本
    pub api_version: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度，None表示使用服务端默认值
    pub temperature: Option<f64>,

    /// 尝试次数，1表示不重试
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单个Agent运行的最大轮数
    pub max_turns: usize,
}

/// 网页搜索配置（Exa）
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Exa API KEY，为空时web_search工具只返回提示信息
    pub api_key: String,

    /// Exa API基地址
    pub api_base_url: String,

    /// 每次搜索返回的结果数
    pub num_results: u32,
}

/// 调研流程配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ResearchConfig {
    /// 生成计划与编写报告之间的停顿（毫秒），仅用于界面节奏
    pub pacing_delay_ms: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 用已设置的环境变量覆盖配置文件中的值
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let overlay = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *target = value;
            }
        };
        overlay(&mut self.llm.api_key, ENV_AZURE_API_KEY);
        overlay(&mut self.llm.endpoint, ENV_AZURE_ENDPOINT);
        overlay(&mut self.llm.deployment, ENV_AZURE_DEPLOYMENT);
        overlay(&mut self.llm.api_version, ENV_AZURE_API_VERSION);
        overlay(&mut self.search.api_key, ENV_EXA_API_KEY);
        overlay(&mut self.server.bind, ENV_BIND);
    }
}

impl LLMConfig {
    /// 检查连接模型服务所必需的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "api_key",
                env: ENV_AZURE_API_KEY,
            });
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "endpoint",
                env: ENV_AZURE_ENDPOINT,
            });
        }
        if self.deployment.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "deployment",
                env: ENV_AZURE_DEPLOYMENT,
            });
        }
        if self.provider == LLMProvider::Azure && self.api_version.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "api_version",
                env: ENV_AZURE_API_VERSION,
            });
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::NotPositive {
                field: "retry_attempts",
            });
        }
        if self.max_turns == 0 {
            return Err(ConfigError::NotPositive { field: "max_turns" });
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: std::env::var(ENV_BIND).unwrap_or_else(|_| String::from("127.0.0.1:8501")),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var(ENV_AZURE_API_KEY).unwrap_or_default(),
            endpoint: std::env::var(ENV_AZURE_ENDPOINT).unwrap_or_default(),
            deployment: std::env::var(ENV_AZURE_DEPLOYMENT).unwrap_or_default(),
            api_version: std::env::var(ENV_AZURE_API_VERSION).unwrap_or_default(),
            max_tokens: 4096,
            temperature: None,
            retry_attempts: 1,
            retry_delay_ms: 2000,
            max_turns: 10,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var(ENV_EXA_API_KEY).unwrap_or_default(),
            api_base_url: String::from("https://api.exa.ai"),
            num_results: 5,
        }
    }
}
