use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use crate::research::agents::AgentRegistry;
use crate::research::runtime::{AgentRuntime, RunInput};
use crate::research::session::{Progress, ResearchSession, RunTicket};
use crate::research::types::{AgentType, ResearchPlan, ResearchReport};

/// 多智能体调研编排器：分诊生成计划，编辑基于完整对话编写报告
#[derive(Clone)]
pub struct ResearchOrchestrator {
    runtime: Arc<dyn AgentRuntime>,
    registry: Arc<AgentRegistry>,
    session: ResearchSession,
    pacing_delay: Duration,
}

impl ResearchOrchestrator {
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        registry: Arc<AgentRegistry>,
        session: ResearchSession,
    ) -> Self {
        Self {
            runtime,
            registry,
            session,
            pacing_delay: Duration::ZERO,
        }
    }

    /// 计划与报告之间的停顿，不做任何工作
    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    pub fn session(&self) -> &ResearchSession {
        &self.session
    }

    /// 重置会话并执行一次完整调研
    pub async fn run(&self, topic: &str) -> Result<ResearchReport> {
        let ticket = self.session.begin_run(topic).await?;
        self.execute(ticket).await
    }

    /// 执行已开始的运行；失败时把错误写入会话，不重试
    pub async fn execute(&self, ticket: RunTicket) -> Result<ResearchReport> {
        match self.execute_pipeline(&ticket).await {
            Ok(report) => {
                info!(run_id = %ticket.run_id, title = %report.title, "research run complete");
                Ok(report)
            }
            Err(e) => {
                error!(run_id = %ticket.run_id, error = %e, "research run failed");
                self.session.fail(format!("{:#}", e)).await;
                Err(e)
            }
        }
    }

    async fn execute_pipeline(&self, ticket: &RunTicket) -> Result<ResearchReport> {
        info!(run_id = %ticket.run_id, topic = %ticket.topic, "generating research plan");
        let triage = self.registry.get(AgentType::Triage)?;
        let plan_result = self
            .runtime
            .run(
                triage,
                RunInput::text(format!("Create a research plan for: {}", ticket.topic)),
            )
            .await?;
        let plan: ResearchPlan = plan_result.final_output_as()?;
        info!(
            run_id = %ticket.run_id,
            queries = plan.search_queries.len(),
            focus_areas = plan.focus_areas.len(),
            "research plan ready"
        );
        self.session.publish_plan(plan).await;

        if !self.pacing_delay.is_zero() {
            tokio::time::sleep(self.pacing_delay).await;
        }
        self.session.set_progress(Progress::Researching).await;

        info!(run_id = %ticket.run_id, "compiling research report");
        let editor = self.registry.get(AgentType::Editor)?;
        let editor_result = self
            .runtime
            .run(editor, RunInput::History(plan_result.to_input_list()))
            .await?;
        let report: ResearchReport = editor_result.final_output_as()?;
        self.session.complete(report.clone()).await;

        Ok(report)
    }
}
