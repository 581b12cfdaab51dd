use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::llm::client::LLMClient;
use crate::llm::runtime::RigRuntime;
use crate::llm::tools::AgentToolWebSearch;
use crate::research::agents::AgentRegistry;
use crate::research::{ResearchOrchestrator, ResearchSession};

#[derive(Clone)]
pub struct AssistantContext {
    /// LLM调用器，用于与AI通信。
    pub llm_client: LLMClient,
    /// 配置
    pub config: Config,
    /// 会话状态，驱动流程、工具与界面共享
    pub session: ResearchSession,
    pub orchestrator: ResearchOrchestrator,
}

impl AssistantContext {
    /// 创建新的上下文，配置不完整时直接报错
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.llm.clone())?;
        let session = ResearchSession::new();
        let registry = Arc::new(AgentRegistry::research_team());

        let runtime = RigRuntime::new(
            llm_client.clone(),
            registry.clone(),
            session.clone(),
            AgentToolWebSearch::new(config.search.clone()),
        );
        let orchestrator = ResearchOrchestrator::new(Arc::new(runtime), registry, session.clone())
            .with_pacing_delay(Duration::from_millis(config.research.pacing_delay_ms));

        Ok(Self {
            llm_client,
            config,
            session,
            orchestrator,
        })
    }
}
