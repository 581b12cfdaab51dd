use crate::research::agents::{DeclaredAgent, OutputType};
use crate::research::types::AgentType;

/// 分诊Agent - 把主题拆成结构化的调研计划，必要时转交给其他Agent
#[derive(Default)]
pub struct TriageAgent;

impl DeclaredAgent for TriageAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Triage
    }

    fn instructions(&self) -> String {
        "Generate structured search queries and focus areas based on the topic.".to_string()
    }

    fn handoffs(&self) -> Vec<AgentType> {
        vec![
            AgentType::QueryRewriting,
            AgentType::Research,
            AgentType::Editor,
        ]
    }

    fn output_type(&self) -> OutputType {
        OutputType::ResearchPlan
    }
}
