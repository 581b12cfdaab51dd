// 调研团队 - 四个静态声明的Agent
// Triage（分诊）：根据主题生成结构化的搜索查询与关注方向，可转交给其余三个Agent
// QueryRewriting（查询改写）：生成 5-8 条多样且精确的搜索查询
// Research（调研）：逐条搜索并通过 save_important_fact 保存关键事实
// Editor（编辑）：基于完整对话历史编写结构化的调研报告

use std::collections::HashMap;

use anyhow::{Result, anyhow};

use crate::research::types::AgentType;

pub mod editor;
pub mod query_rewriter;
pub mod researcher;
pub mod triage;

pub use editor::EditorAgent;
pub use query_rewriter::QueryRewritingAgent;
pub use researcher::ResearchAgent;
pub use triage::TriageAgent;

/// Agent可以使用的工具
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    WebSearch,
    SaveImportantFact,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::WebSearch => "web_search",
            ToolKind::SaveImportantFact => "save_important_fact",
        }
    }
}

/// Agent的输出形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// 自由文本
    Text,
    /// 结构化输出为 ResearchPlan
    ResearchPlan,
    /// 结构化输出为 ResearchReport
    ResearchReport,
}

impl OutputType {
    pub fn is_structured(&self) -> bool {
        !matches!(self, OutputType::Text)
    }
}

/// 运行时据此构建具体的模型Agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDefinition {
    pub agent_type: AgentType,
    pub instructions: String,
    pub tools: Vec<ToolKind>,
    pub handoffs: Vec<AgentType>,
    pub output_type: OutputType,
}

impl AgentDefinition {
    pub fn name(&self) -> &'static str {
        self.agent_type.name()
    }

    pub fn uses_tool(&self, tool: ToolKind) -> bool {
        self.tools.contains(&tool)
    }

    /// 是否需要多轮工具调用（工具或转交）
    pub fn needs_tool_loop(&self) -> bool {
        !self.tools.is_empty() || !self.handoffs.is_empty()
    }
}

/// 声明式Agent - 只描述配置，执行交给运行时
pub trait DeclaredAgent: Send + Sync {
    fn agent_type(&self) -> AgentType;

    fn instructions(&self) -> String;

    fn tools(&self) -> Vec<ToolKind> {
        vec![]
    }

    fn handoffs(&self) -> Vec<AgentType> {
        vec![]
    }

    fn output_type(&self) -> OutputType {
        OutputType::Text
    }

    fn definition(&self) -> AgentDefinition {
        AgentDefinition {
            agent_type: self.agent_type(),
            instructions: self.instructions(),
            tools: self.tools(),
            handoffs: self.handoffs(),
            output_type: self.output_type(),
        }
    }
}

/// Agent注册表
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: HashMap<AgentType, AgentDefinition>,
}

impl AgentRegistry {
    pub fn new(declarations: &[&dyn DeclaredAgent]) -> Self {
        let agents = declarations
            .iter()
            .map(|declared| (declared.agent_type(), declared.definition()))
            .collect();
        Self { agents }
    }

    /// 默认的四人调研团队
    pub fn research_team() -> Self {
        Self::new(&[
            &TriageAgent,
            &QueryRewritingAgent,
            &ResearchAgent,
            &EditorAgent,
        ])
    }

    pub fn get(&self, agent_type: AgentType) -> Result<&AgentDefinition> {
        self.agents
            .get(&agent_type)
            .ok_or_else(|| anyhow!("agent {} is not registered", agent_type))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::research_team()
    }
}
