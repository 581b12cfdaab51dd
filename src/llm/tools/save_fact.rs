//! 关键事实保存工具

use rig::tool::Tool;
use serde::Deserialize;
use tracing::debug;

use crate::llm::tools::ToolError;
use crate::research::session::ResearchSession;

/// 保存事实工具，写入当前会话的事实列表
#[derive(Clone)]
pub struct AgentToolSaveFact {
    session: ResearchSession,
}

/// 保存事实参数
#[derive(Debug, Deserialize)]
pub struct SaveFactArgs {
    pub fact: String,
    pub source: Option<String>,
}

impl AgentToolSaveFact {
    pub fn new(session: ResearchSession) -> Self {
        Self { session }
    }
}

impl Tool for AgentToolSaveFact {
    const NAME: &'static str = "save_important_fact";

    type Error = ToolError;
    type Args = SaveFactArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Save a key insight discovered during research. Facts are deduplicated by exact text.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "fact": {
                        "type": "string",
                        "description": "The fact or insight to remember."
                    },
                    "source": {
                        "type": "string",
                        "description": "Where the fact came from, for example a URL."
                    }
                },
                "required": ["fact"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        debug!(fact = %args.fact, source = ?args.source, "tool called: save_important_fact");

        Ok(self
            .session
            .save_fact(&args.fact, args.source.as_deref())
            .await)
    }
}
