//! 提供给Agent的工具

pub mod handoff;
pub mod save_fact;
pub mod web_search;

pub use handoff::AgentToolHandoff;
pub use save_fact::AgentToolSaveFact;
pub use web_search::AgentToolWebSearch;

/// 工具错误，会作为工具结果反馈给模型
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("web search request failed: {0}")]
    Search(#[from] reqwest::Error),
    #[error("unknown agent `{0}`")]
    UnknownAgent(String),
    #[error("handoff to {0} is not allowed here")]
    HandoffNotAllowed(String),
    #[error("{agent} failed: {message}")]
    Handoff { agent: String, message: String },
}
