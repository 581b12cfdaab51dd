use crate::research::agents::{DeclaredAgent, OutputType};
use crate::research::types::AgentType;

/// 编辑Agent - 汇总对话历史，输出结构化的 ResearchReport
#[derive(Default)]
pub struct EditorAgent;

impl DeclaredAgent for EditorAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Editor
    }

    fn instructions(&self) -> String {
        "Compile a well-structured research report, ensuring clarity and completeness."
            .to_string()
    }

    fn output_type(&self) -> OutputType {
        OutputType::ResearchReport
    }
}
