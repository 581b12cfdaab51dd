//! 转交工具 - 让一个Agent把子任务交给声明过的其他Agent

use std::sync::Arc;

use rig::tool::Tool;
use serde::Deserialize;
use tracing::info;

use crate::llm::tools::ToolError;
use crate::research::agents::AgentRegistry;
use crate::research::runtime::{AgentRuntime, RunInput};
use crate::research::types::AgentType;

/// 转交工具，agent参数只能取声明的转交目标
#[derive(Clone)]
pub struct AgentToolHandoff {
    runtime: Arc<dyn AgentRuntime>,
    registry: Arc<AgentRegistry>,
    targets: Vec<AgentType>,
}

/// 转交参数
#[derive(Debug, Deserialize)]
pub struct HandoffArgs {
    pub agent: String,
    pub input: String,
}

impl AgentToolHandoff {
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        registry: Arc<AgentRegistry>,
        targets: Vec<AgentType>,
    ) -> Self {
        Self {
            runtime,
            registry,
            targets,
        }
    }

    fn resolve_target(&self, name: &str) -> Result<AgentType, ToolError> {
        let agent = name
            .parse::<AgentType>()
            .map_err(|_| ToolError::UnknownAgent(name.to_string()))?;
        if !self.targets.contains(&agent) {
            return Err(ToolError::HandoffNotAllowed(agent.to_string()));
        }
        Ok(agent)
    }
}

impl Tool for AgentToolHandoff {
    const NAME: &'static str = "transfer_to_agent";

    type Error = ToolError;
    type Args = HandoffArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        let names: Vec<&str> = self.targets.iter().map(|agent| agent.name()).collect();
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: format!(
                "Hand a sub-task to another agent and receive its answer. Available agents: {}.",
                names.join(", ")
            ),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "agent": {
                        "type": "string",
                        "enum": names,
                        "description": "The agent that should continue the work."
                    },
                    "input": {
                        "type": "string",
                        "description": "Everything the agent needs to know to do its task."
                    }
                },
                "required": ["agent", "input"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let agent = self.resolve_target(&args.agent)?;
        info!(agent = %agent, "handing off");

        let definition = self
            .registry
            .get(agent)
            .map_err(|_| ToolError::UnknownAgent(agent.to_string()))?;

        let result = self
            .runtime
            .run(definition, RunInput::Text(args.input))
            .await
            .map_err(|e| ToolError::Handoff {
                agent: agent.to_string(),
                message: format!("{:#}", e),
            })?;

        Ok(result.final_output_text())
    }
}
