//! 基于rig的Agent运行时
//!
//! 文本输出的Agent直接跑多轮对话；结构化输出的Agent若带工具或转交目标，
//! 先跑多轮工具调用，再在得到的对话历史上用Extractor提取最终结构。

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use rig::completion::Message;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::llm::client::{AgentToolbox, LLMClient};
use crate::llm::tools::{AgentToolHandoff, AgentToolSaveFact, AgentToolWebSearch};
use crate::research::agents::{AgentDefinition, AgentRegistry, OutputType, ToolKind};
use crate::research::runtime::{AgentRuntime, RunInput, RunResult};
use crate::research::session::ResearchSession;
use crate::research::types::{ResearchPlan, ResearchReport};

/// 工具循环结束后请求结构化结果的提示
const STRUCTURED_ANSWER_PROMPT: &str = "Provide your final answer as structured output.";

#[derive(Clone)]
pub struct RigRuntime {
    client: LLMClient,
    registry: Arc<AgentRegistry>,
    session: ResearchSession,
    web_search: AgentToolWebSearch,
}

impl RigRuntime {
    pub fn new(
        client: LLMClient,
        registry: Arc<AgentRegistry>,
        session: ResearchSession,
        web_search: AgentToolWebSearch,
    ) -> Self {
        Self {
            client,
            registry,
            session,
            web_search,
        }
    }

    /// 按声明为Agent装配工具
    pub fn toolbox_for(&self, agent: &AgentDefinition) -> AgentToolbox {
        let mut toolbox = AgentToolbox::default();
        if agent.uses_tool(ToolKind::WebSearch) {
            toolbox.web_search = Some(self.web_search.clone());
        }
        if agent.uses_tool(ToolKind::SaveImportantFact) {
            toolbox.save_fact = Some(AgentToolSaveFact::new(self.session.clone()));
        }
        if !agent.handoffs.is_empty() {
            toolbox.handoff = Some(AgentToolHandoff::new(
                Arc::new(self.clone()),
                self.registry.clone(),
                agent.handoffs.clone(),
            ));
        }
        toolbox
    }

    async fn extract_structured(
        &self,
        agent: &AgentDefinition,
        prompt: &str,
        history: Vec<Message>,
    ) -> Result<Value> {
        match agent.output_type {
            OutputType::ResearchPlan => {
                let plan: ResearchPlan = self
                    .client
                    .extract(&agent.instructions, prompt, history)
                    .await?;
                to_value(&plan)
            }
            OutputType::ResearchReport => {
                let report: ResearchReport = self
                    .client
                    .extract(&agent.instructions, prompt, history)
                    .await?;
                to_value(&report)
            }
            OutputType::Text => bail!("{} does not declare a structured output", agent.name()),
        }
    }
}

fn to_value<T: Serialize>(output: &T) -> Result<Value> {
    Ok(serde_json::to_value(output)?)
}

#[async_trait]
impl AgentRuntime for RigRuntime {
    async fn run(&self, agent: &AgentDefinition, input: RunInput) -> Result<RunResult> {
        let (prompt, history) = input.into_prompt();
        info!(agent = agent.name(), "running agent");

        if !agent.output_type.is_structured() {
            let (answer, history) = self
                .client
                .prompt_with_history(
                    agent.name(),
                    &agent.instructions,
                    self.toolbox_for(agent),
                    &prompt,
                    history,
                )
                .await?;
            return Ok(RunResult {
                agent: agent.agent_type,
                final_output: Value::String(answer),
                history,
            });
        }

        let (extract_prompt, mut history) = if agent.needs_tool_loop() {
            let (draft, history) = self
                .client
                .prompt_with_history(
                    agent.name(),
                    &agent.instructions,
                    self.toolbox_for(agent),
                    &prompt,
                    history,
                )
                .await?;
            debug!(agent = agent.name(), draft = %draft, "tool loop finished");
            (STRUCTURED_ANSWER_PROMPT.to_string(), history)
        } else {
            (prompt, history)
        };

        let final_output = self
            .extract_structured(agent, &extract_prompt, history.clone())
            .await?;

        history.push(Message::user(extract_prompt));
        history.push(Message::assistant(final_output.to_string()));

        Ok(RunResult {
            agent: agent.agent_type,
            final_output,
            history,
        })
    }
}
