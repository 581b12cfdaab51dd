//! 调研会话状态 - 一次运行内由驱动流程、工具回调与界面共享

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::research::facts::FactStore;
use crate::research::types::{ResearchPlan, ResearchReport};

/// 运行进度里程碑
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Progress {
    #[default]
    NotStarted,
    PlanReady,
    Researching,
    Complete,
}

impl Progress {
    pub fn percent(self) -> u8 {
        match self {
            Progress::NotStarted => 0,
            Progress::PlanReady => 25,
            Progress::Researching => 50,
            Progress::Complete => 100,
        }
    }
}

impl Serialize for Progress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.percent())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RunError {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("a research run is already in progress")]
    Busy,
}

/// 会话内的全部运行状态，每次新运行开始时整体重置
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunState {
    pub run_id: Option<Uuid>,
    pub topic: Option<String>,
    pub progress: Progress,
    pub research_started: bool,
    pub research_done: bool,
    pub running: bool,
    pub plan: Option<ResearchPlan>,
    pub report: Option<ResearchReport>,
    pub facts: FactStore,
    pub error: Option<String>,
}

/// 开始运行后交给驱动流程的凭据
#[derive(Debug, Clone)]
pub struct RunTicket {
    pub run_id: Uuid,
    pub topic: String,
}

#[derive(Clone)]
pub struct ResearchSession {
    state: Arc<RwLock<RunState>>,
    progress_tx: broadcast::Sender<Progress>,
}

impl Default for ResearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ResearchSession {
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(16);
        Self {
            state: Arc::new(RwLock::new(RunState::default())),
            progress_tx,
        }
    }

    /// 订阅进度变化，每个里程碑推送一次
    pub fn subscribe(&self) -> broadcast::Receiver<Progress> {
        self.progress_tx.subscribe()
    }

    /// 重置全部运行状态并标记运行开始
    pub async fn begin_run(&self, topic: &str) -> Result<RunTicket, RunError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(RunError::EmptyTopic);
        }

        let mut state = self.state.write().await;
        if state.running {
            return Err(RunError::Busy);
        }

        let run_id = Uuid::new_v4();
        *state = RunState {
            run_id: Some(run_id),
            topic: Some(topic.to_string()),
            research_started: true,
            running: true,
            ..Default::default()
        };
        drop(state);

        self.notify(Progress::NotStarted);
        Ok(RunTicket {
            run_id,
            topic: topic.to_string(),
        })
    }

    pub async fn publish_plan(&self, plan: ResearchPlan) {
        let mut state = self.state.write().await;
        state.plan = Some(plan);
        state.progress = Progress::PlanReady;
        drop(state);
        self.notify(Progress::PlanReady);
    }

    pub async fn set_progress(&self, progress: Progress) {
        self.state.write().await.progress = progress;
        self.notify(progress);
    }

    pub async fn complete(&self, report: ResearchReport) {
        let mut state = self.state.write().await;
        state.report = Some(report);
        state.research_done = true;
        state.running = false;
        state.progress = Progress::Complete;
        drop(state);
        self.notify(Progress::Complete);
    }

    /// 运行失败：记录错误，进度停留在当前里程碑
    pub async fn fail(&self, message: impl Into<String>) {
        let mut state = self.state.write().await;
        state.error = Some(message.into());
        state.running = false;
    }

    pub async fn save_fact(&self, fact: &str, source: Option<&str>) -> String {
        self.state.write().await.facts.save(fact, source)
    }

    pub async fn snapshot(&self) -> RunState {
        self.state.read().await.clone()
    }

    pub async fn report(&self) -> Option<ResearchReport> {
        self.state.read().await.report.clone()
    }

    fn notify(&self, progress: Progress) {
        // 没有订阅者时发送失败是正常情况
        let _ = self.progress_tx.send(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> ResearchPlan {
        ResearchPlan {
            topic: "tidal energy".to_string(),
            search_queries: vec!["tidal turbines cost".to_string()],
            focus_areas: vec!["economics".to_string()],
        }
    }

    #[tokio::test]
    async fn test_begin_run_rejects_blank_topic() {
        let session = ResearchSession::new();
        assert_eq!(session.begin_run("   ").await.unwrap_err(), RunError::EmptyTopic);
        assert!(!session.snapshot().await.research_started);
    }

    #[tokio::test]
    async fn test_begin_run_rejects_concurrent_run() {
        let session = ResearchSession::new();
        session.begin_run("tidal energy").await.unwrap();
        assert_eq!(session.begin_run("wind").await.unwrap_err(), RunError::Busy);
    }

    #[tokio::test]
    async fn test_begin_run_resets_previous_state() {
        let session = ResearchSession::new();
        session.begin_run("first").await.unwrap();
        session.save_fact("old fact", Some("old source")).await;
        session.publish_plan(sample_plan()).await;
        session.fail("endpoint unreachable").await;

        let ticket = session.begin_run("  second  ").await.unwrap();
        let state = session.snapshot().await;

        assert_eq!(ticket.topic, "second");
        assert_eq!(state.run_id, Some(ticket.run_id));
        assert!(state.facts.is_empty());
        assert!(state.plan.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.progress, Progress::NotStarted);
        assert!(state.research_started);
        assert!(!state.research_done);
    }

    #[tokio::test]
    async fn test_failure_keeps_progress() {
        let session = ResearchSession::new();
        session.begin_run("topic").await.unwrap();
        session.publish_plan(sample_plan()).await;
        session.fail("boom").await;

        let state = session.snapshot().await;
        assert_eq!(state.progress.percent(), 25);
        assert!(!state.research_done);
        assert!(!state.running);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_subscribers_see_each_milestone() {
        let session = ResearchSession::new();
        let mut rx = session.subscribe();

        session.begin_run("topic").await.unwrap();
        session.publish_plan(sample_plan()).await;
        session.set_progress(Progress::Researching).await;
        let report = ResearchReport::new("T", vec![], "body", vec![], 3).unwrap();
        session.complete(report).await;

        let mut seen = Vec::new();
        while let Ok(progress) = rx.try_recv() {
            seen.push(progress.percent());
        }
        assert_eq!(seen, vec![0, 25, 50, 100]);
        assert!(session.snapshot().await.research_done);
    }

    #[test]
    fn test_progress_serializes_as_percent() {
        assert_eq!(serde_json::to_value(Progress::Researching).unwrap(), 50);
        assert_eq!(serde_json::to_value(Progress::Complete).unwrap(), 100);
    }
}
