use crate::research::agents::DeclaredAgent;
use crate::research::types::AgentType;

#[derive(Default)]
pub struct QueryRewritingAgent;

impl DeclaredAgent for QueryRewritingAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::QueryRewriting
    }

    fn instructions(&self) -> String {
        "Generate 5–8 diverse, precise search queries. Respond in a bullet list.".to_string()
    }
}
