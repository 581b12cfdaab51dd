//! 测试用的脚本化运行时，不访问任何模型服务

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use rig::completion::Message;
use rig::tool::Tool;
use serde_json::{Value, json};
use tokio::sync::Notify;

use research_assistant::llm::tools::AgentToolSaveFact;
use research_assistant::llm::tools::save_fact::SaveFactArgs;
use research_assistant::research::agents::{AgentDefinition, AgentRegistry};
use research_assistant::research::runtime::{AgentRuntime, RunInput, RunResult};
use research_assistant::research::{AgentType, ResearchOrchestrator, ResearchSession};

/// 一次Agent调用的记录
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub agent: AgentType,
    pub prompt: String,
    pub history_len: usize,
    /// 调用开始时会话中已有的事实数量
    pub facts_before: usize,
}

/// 按Agent类型返回预设输出；分诊阶段通过真实的保存事实工具写入一条事实
pub struct ScriptedRuntime {
    session: ResearchSession,
    plan: Value,
    report: Value,
    fail_on: Option<AgentType>,
    panic_on: Option<AgentType>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRuntime {
    pub fn new(session: ResearchSession) -> Self {
        Self {
            session,
            plan: sample_plan("solid-state batteries"),
            report: sample_report("Solid State Batteries", 420),
            fail_on: None,
            panic_on: None,
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_report(mut self, report: Value) -> Self {
        self.report = report;
        self
    }

    pub fn failing_on(mut self, agent: AgentType) -> Self {
        self.fail_on = Some(agent);
        self
    }

    /// 模拟运行任务本身崩溃
    pub fn panicking_on(mut self, agent: AgentType) -> Self {
        self.panic_on = Some(agent);
        self
    }

    /// 分诊阶段等待放行，用于模拟耗时的运行
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    async fn run(&self, agent: &AgentDefinition, input: RunInput) -> Result<RunResult> {
        let (prompt, mut history) = input.into_prompt();
        let facts_before = self.session.snapshot().await.facts.len();
        self.calls.lock().unwrap().push(RecordedCall {
            agent: agent.agent_type,
            prompt: prompt.clone(),
            history_len: history.len(),
            facts_before,
        });

        if let Some(gate) = &self.gate {
            if agent.agent_type == AgentType::Triage {
                gate.notified().await;
            }
        }

        if self.panic_on == Some(agent.agent_type) {
            panic!("{} crashed", agent.name());
        }

        if self.fail_on == Some(agent.agent_type) {
            bail!("{} could not reach the model endpoint", agent.name());
        }

        let final_output = match agent.agent_type {
            AgentType::Triage => {
                AgentToolSaveFact::new(self.session.clone())
                    .call(SaveFactArgs {
                        fact: format!("fact gathered for: {}", prompt),
                        source: Some("https://example.org/source".to_string()),
                    })
                    .await?;
                self.plan.clone()
            }
            AgentType::Editor => self.report.clone(),
            _ => Value::String(format!("{} handled: {}", agent.name(), prompt)),
        };

        history.push(Message::user(prompt));
        history.push(Message::assistant(final_output.to_string()));

        Ok(RunResult {
            agent: agent.agent_type,
            final_output,
            history,
        })
    }
}

pub fn sample_plan(topic: &str) -> Value {
    json!({
        "topic": topic,
        "search_queries": [
            format!("{} latest breakthroughs", topic),
            format!("{} commercialization timeline", topic),
        ],
        "focus_areas": ["chemistry", "manufacturing", "market"],
    })
}

pub fn sample_report(title: &str, word_count: i64) -> Value {
    json!({
        "title": title,
        "outline": ["Introduction", "Current State", "Outlook"],
        "report": format!("# {}\n\nSolid electrolytes replace liquid ones.", title),
        "sources": ["https://example.org/source"],
        "word_count": word_count,
    })
}

/// 组装使用脚本化运行时的编排器
pub fn orchestrator_with(
    build: impl FnOnce(ResearchSession) -> ScriptedRuntime,
) -> (ResearchOrchestrator, Arc<ScriptedRuntime>, ResearchSession) {
    let session = ResearchSession::new();
    let runtime = Arc::new(build(session.clone()));
    let orchestrator = ResearchOrchestrator::new(
        runtime.clone(),
        Arc::new(AgentRegistry::research_team()),
        session.clone(),
    );
    (orchestrator, runtime, session)
}
