//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use rig::completion::Message;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{info, warn};

use crate::config::LLMConfig;

mod providers;

pub use providers::AgentToolbox;

use providers::ProviderClient;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        config.validate()?;
        let client = ProviderClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<()> {
        info!(deployment = %self.config.deployment, "checking model connection");
        let agent = self.client.create_agent(
            &self.config.deployment,
            "Connection Check",
            "You are a helpful assistant.",
            &self.config,
            AgentToolbox::default(),
        );
        match self.retry_with_backoff(|| async { agent.prompt("Hello").await }).await {
            Ok(_) => {
                info!("model connection ok");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "model connection failed");
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，retry_attempts为1时只尝试一次
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_attempts = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut attempts = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    attempts += 1;
                    if attempts >= max_attempts {
                        return Err(err);
                    }
                    warn!(
                        attempt = attempts,
                        max_attempts,
                        error = %err,
                        "model call failed, retrying"
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// 在对话历史上运行带工具的多轮对话，返回最终文本与更新后的历史
    pub async fn prompt_with_history(
        &self,
        agent_name: &str,
        system_prompt: &str,
        toolbox: AgentToolbox,
        user_prompt: &str,
        history: Vec<Message>,
    ) -> Result<(String, Vec<Message>)> {
        let agent = self.client.create_agent(
            &self.config.deployment,
            agent_name,
            system_prompt,
            &self.config,
            toolbox,
        );
        let max_turns = self.config.max_turns;

        self.retry_with_backoff(|| async {
            let mut chat_history = history.clone();
            let response = agent
                .multi_turn_with_history(user_prompt, &mut chat_history, max_turns)
                .await?;
            Ok::<_, anyhow::Error>((response, chat_history))
        })
        .await
    }

    /// 基于对话历史提取结构化数据
    pub async fn extract<T>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        history: Vec<Message>,
    ) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let extractor =
            self.client
                .create_extractor::<T>(&self.config.deployment, system_prompt, &self.config);

        self.retry_with_backoff(|| async {
            extractor
                .extract_with_history(user_prompt, history.clone())
                .await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LLMProvider;

    fn config(provider: LLMProvider) -> LLMConfig {
        LLMConfig {
            provider,
            api_key: "test-key".to_string(),
            endpoint: "https://example.openai.azure.com".to_string(),
            deployment: "gpt-4o-mini".to_string(),
            api_version: "2024-10-21".to_string(),
            retry_delay_ms: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_incomplete_config() {
        let mut incomplete = config(LLMProvider::Azure);
        incomplete.endpoint.clear();
        assert!(LLMClient::new(incomplete).is_err());
    }

    #[test]
    fn test_new_builds_both_providers() {
        assert!(LLMClient::new(config(LLMProvider::Azure)).is_ok());
        assert!(LLMClient::new(config(LLMProvider::OpenAI)).is_ok());
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let client = LLMClient::new(config(LLMProvider::Azure)).unwrap();
        let calls = std::sync::atomic::AtomicU32::new(0);

        let result: Result<()> = client
            .retry_with_backoff(|| async {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Err(anyhow::anyhow!("unreachable endpoint"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let mut retrying = config(LLMProvider::Azure);
        retrying.retry_attempts = 3;
        let client = LLMClient::new(retrying).unwrap();
        let calls = std::sync::atomic::AtomicU32::new(0);

        let result = client
            .retry_with_backoff(|| async {
                let n = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                if n < 2 {
                    Err(anyhow::anyhow!("flaky"))
                } else {
                    Ok(n)
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 2);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }
}
