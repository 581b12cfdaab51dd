// 调研流程
// 1. 分诊Agent根据主题生成 ResearchPlan（进度 25）
// 2. 进入调研阶段（进度 50）
// 3. 编辑Agent基于第1步的完整对话历史生成 ResearchReport（进度 100）
// 调研Agent与查询改写Agent只会经由分诊Agent的转交被调用

pub mod agents;
pub mod facts;
pub mod orchestrator;
pub mod runtime;
pub mod session;
pub mod types;

pub use orchestrator::ResearchOrchestrator;
pub use session::{Progress, ResearchSession, RunError, RunState, RunTicket};
pub use types::{AgentType, FactRecord, ResearchPlan, ResearchReport};
