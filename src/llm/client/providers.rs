//! LLM Provider支持模块

use anyhow::Result;
use rig::{
    agent::{Agent, AgentBuilder, AgentBuilderSimple},
    client::CompletionClient,
    completion::{CompletionModel, Message, Prompt, PromptError},
    extractor::Extractor,
    providers::azure::AzureOpenAIAuth,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{LLMConfig, LLMProvider};
use crate::llm::tools::{AgentToolHandoff, AgentToolSaveFact, AgentToolWebSearch};

type AzureCompletionModel = rig::providers::azure::CompletionModel;

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    Azure(rig::providers::azure::Client),
    OpenAI(rig::providers::openai::Client),
}

/// 挂载到Agent上的工具
#[derive(Clone, Default)]
pub struct AgentToolbox {
    pub web_search: Option<AgentToolWebSearch>,
    pub save_fact: Option<AgentToolSaveFact>,
    pub handoff: Option<AgentToolHandoff>,
}

impl AgentToolbox {
    pub fn is_empty(&self) -> bool {
        self.web_search.is_none() && self.save_fact.is_none() && self.handoff.is_none()
    }

    fn equip<M: CompletionModel>(self, builder: AgentBuilder<M>) -> Agent<M> {
        // rig 0.23: `AgentBuilder::tool` returns an `AgentBuilderSimple`
        let mut simple: Option<AgentBuilderSimple<M>> = None;
        let mut builder = Some(builder);
        macro_rules! add_tool {
            ($tool:expr) => {
                simple = Some(match simple.take() {
                    Some(b) => b.tool($tool),
                    None => builder.take().unwrap().tool($tool),
                });
            };
        }
        if let Some(tool) = self.web_search {
            add_tool!(tool);
        }
        if let Some(tool) = self.save_fact {
            add_tool!(tool);
        }
        if let Some(tool) = self.handoff {
            add_tool!(tool);
        }
        match simple {
            Some(b) => b.build(),
            None => builder.unwrap().build(),
        }
    }
}

fn with_sampling<M: CompletionModel>(
    builder: AgentBuilder<M>,
    config: &LLMConfig,
) -> AgentBuilder<M> {
    let builder = builder.max_tokens(config.max_tokens.into());
    match config.temperature {
        Some(temperature) => builder.temperature(temperature),
        None => builder,
    }
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        match config.provider {
            LLMProvider::Azure => {
                let client = rig::providers::azure::Client::builder(
                    AzureOpenAIAuth::ApiKey(config.api_key.clone()),
                    &config.endpoint,
                )
                .api_version(&config.api_version)
                .build();
                Ok(ProviderClient::Azure(client))
            }
            LLMProvider::OpenAI => {
                let client = rig::providers::openai::Client::builder(&config.api_key)
                    .base_url(&config.endpoint)
                    .build();
                Ok(ProviderClient::OpenAI(client))
            }
        }
    }

    /// 创建Agent，toolbox为空时即为不带工具的Agent
    pub fn create_agent(
        &self,
        model: &str,
        name: &str,
        system_prompt: &str,
        config: &LLMConfig,
        toolbox: AgentToolbox,
    ) -> ProviderAgent {
        match self {
            ProviderClient::Azure(client) => {
                let builder = client.agent(model).name(name).preamble(system_prompt);
                let builder = toolbox.equip(with_sampling(builder, config));
                ProviderAgent::Azure(builder)
            }
            ProviderClient::OpenAI(client) => {
                let builder = client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder()
                    .name(name)
                    .preamble(system_prompt);
                let builder = toolbox.equip(with_sampling(builder, config));
                ProviderAgent::OpenAI(builder)
            }
        }
    }

    /// 创建Extractor
    pub fn create_extractor<T>(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
    ) -> ProviderExtractor<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        match self {
            ProviderClient::Azure(client) => {
                let extractor = client
                    .extractor::<T>(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .build();
                ProviderExtractor::Azure(extractor)
            }
            ProviderClient::OpenAI(client) => {
                let extractor = client
                    .extractor_completions_api::<T>(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .build();
                ProviderExtractor::OpenAI(extractor)
            }
        }
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    Azure(Agent<AzureCompletionModel>),
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
}

impl ProviderAgent {
    /// 执行prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        match self {
            ProviderAgent::Azure(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
        }
    }

    /// 在已有对话历史上执行多轮对话，history会追加本轮的全部消息
    pub async fn multi_turn_with_history(
        &self,
        prompt: &str,
        history: &mut Vec<Message>,
        max_turns: usize,
    ) -> Result<String, PromptError> {
        match self {
            ProviderAgent::Azure(agent) => {
                agent
                    .prompt(prompt)
                    .with_history(history)
                    .multi_turn(max_turns)
                    .await
            }
            ProviderAgent::OpenAI(agent) => {
                agent
                    .prompt(prompt)
                    .with_history(history)
                    .multi_turn(max_turns)
                    .await
            }
        }
    }
}

/// 统一的Extractor枚举
pub enum ProviderExtractor<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    Azure(Extractor<AzureCompletionModel, T>),
    OpenAI(Extractor<rig::providers::openai::CompletionModel, T>),
}

impl<T> ProviderExtractor<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    /// 基于对话历史执行提取
    pub async fn extract_with_history(&self, prompt: &str, history: Vec<Message>) -> Result<T> {
        match self {
            ProviderExtractor::Azure(extractor) => extractor
                .extract_with_chat_history(prompt, history)
                .await
                .map_err(|e| e.into()),
            ProviderExtractor::OpenAI(extractor) => extractor
                .extract_with_chat_history(prompt, history)
                .await
                .map_err(|e| e.into()),
        }
    }
}
