//! Agent运行时边界 - 驱动流程只依赖这个trait，具体的模型调用由实现方负责

use anyhow::{Context, Result};
use async_trait::async_trait;
use rig::completion::Message;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::research::agents::AgentDefinition;
use crate::research::types::AgentType;

/// 以对话历史作为输入时，追加在历史末尾的用户消息
pub const CONTINUE_FROM_HISTORY: &str =
    "Continue from the conversation above and produce your final answer.";

/// 一次Agent运行的输入
#[derive(Debug, Clone)]
pub enum RunInput {
    /// 单条用户消息
    Text(String),
    /// 先前运行的完整对话历史
    History(Vec<Message>),
}

impl RunInput {
    pub fn text(text: impl Into<String>) -> Self {
        RunInput::Text(text.into())
    }

    /// 拆分为 (本轮prompt, 已有历史)
    pub fn into_prompt(self) -> (String, Vec<Message>) {
        match self {
            RunInput::Text(text) => (text, Vec::new()),
            RunInput::History(history) => (CONTINUE_FROM_HISTORY.to_string(), history),
        }
    }
}

/// 一次Agent运行的结果
#[derive(Debug, Clone)]
pub struct RunResult {
    pub agent: AgentType,
    /// 文本输出为 Value::String，结构化输出为对应的JSON对象
    pub final_output: Value,
    /// 包含本次输入、工具调用与最终回答的完整对话
    pub history: Vec<Message>,
}

impl RunResult {
    /// 按声明的结构解析最终输出，校验规则在反序列化时生效
    pub fn final_output_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.final_output.clone()).with_context(|| {
            format!(
                "{} returned output that does not match the expected structure",
                self.agent
            )
        })
    }

    /// 最终输出的文本形式
    pub fn final_output_text(&self) -> String {
        match &self.final_output {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }

    /// 作为下一次运行的输入
    pub fn to_input_list(&self) -> Vec<Message> {
        self.history.clone()
    }
}

#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// 运行一个已声明的Agent直到得到最终输出
    async fn run(&self, agent: &AgentDefinition, input: RunInput) -> Result<RunResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::types::{ResearchPlan, ResearchReport};

    #[test]
    fn test_history_input_appends_continuation_prompt() {
        let history = vec![Message::user("Create a research plan for: bees")];
        let (prompt, returned) = RunInput::History(history).into_prompt();

        assert_eq!(prompt, CONTINUE_FROM_HISTORY);
        assert_eq!(returned.len(), 1);

        let (prompt, returned) = RunInput::text("hello").into_prompt();
        assert_eq!(prompt, "hello");
        assert!(returned.is_empty());
    }

    #[test]
    fn test_final_output_as_structured_types() {
        let result = RunResult {
            agent: AgentType::Triage,
            final_output: serde_json::json!({
                "topic": "bees",
                "search_queries": ["bee decline causes"],
                "focus_areas": ["pesticides"],
            }),
            history: vec![],
        };
        let plan: ResearchPlan = result.final_output_as().unwrap();
        assert_eq!(plan.search_queries, vec!["bee decline causes".to_string()]);

        // 不符合校验规则的报告会在解析时失败
        let invalid = RunResult {
            agent: AgentType::Editor,
            final_output: serde_json::json!({
                "title": "Bees",
                "outline": [],
                "report": "",
                "sources": [],
                "word_count": 0,
            }),
            history: vec![],
        };
        assert!(invalid.final_output_as::<ResearchReport>().is_err());
    }

    #[test]
    fn test_final_output_text() {
        let text = RunResult {
            agent: AgentType::QueryRewriting,
            final_output: Value::String("- query one".to_string()),
            history: vec![],
        };
        assert_eq!(text.final_output_text(), "- query one");

        let structured = RunResult {
            agent: AgentType::Triage,
            final_output: serde_json::json!({"topic": "bees"}),
            history: vec![],
        };
        assert_eq!(structured.final_output_text(), r#"{"topic":"bees"}"#);
    }
}
