use crate::research::agents::{DeclaredAgent, ToolKind};
use crate::research::types::AgentType;

/// 调研Agent - 逐条执行查询并保存关键事实
#[derive(Default)]
pub struct ResearchAgent;

impl DeclaredAgent for ResearchAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Research
    }

    fn instructions(&self) -> String {
        r#"For each query:
1. Search the web.
2. Save key insights using save_important_fact().
3. Format output in Markdown."#
            .to_string()
    }

    fn tools(&self) -> Vec<ToolKind> {
        vec![ToolKind::WebSearch, ToolKind::SaveImportantFact]
    }
}
