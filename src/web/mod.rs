//! HTTP界面：单页 + 页面轮询的JSON接口

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::outlet::report_file_name;
use crate::research::{
    FactRecord, ResearchOrchestrator, ResearchPlan, ResearchSession, RunError, RunState,
};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub struct AppState {
    pub version: &'static str,
    pub session: ResearchSession,
    pub orchestrator: ResearchOrchestrator,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(orchestrator: ResearchOrchestrator) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            session: orchestrator.session().clone(),
            orchestrator,
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct StartResearch {
    pub topic: String,
}

#[derive(Debug, Serialize)]
struct RunStarted {
    run_id: String,
    topic: String,
}

#[derive(Serialize)]
struct ApiError {
    error: String,
}

/// 页面使用的报告视图，正文额外提供渲染后的HTML
#[derive(Debug, Serialize)]
struct ReportView {
    title: String,
    outline: Vec<String>,
    report: String,
    report_html: String,
    sources: Vec<String>,
    word_count: u64,
    file_name: String,
}

#[derive(Debug, Serialize)]
struct StateView {
    run_id: Option<String>,
    topic: Option<String>,
    progress: u8,
    research_started: bool,
    research_done: bool,
    running: bool,
    plan: Option<ResearchPlan>,
    report: Option<ReportView>,
    facts: Vec<FactRecord>,
    error: Option<String>,
}

impl From<RunState> for StateView {
    fn from(state: RunState) -> Self {
        Self {
            run_id: state.run_id.map(|id| id.to_string()),
            topic: state.topic,
            progress: state.progress.percent(),
            research_started: state.research_started,
            research_done: state.research_done,
            running: state.running,
            plan: state.plan,
            report: state.report.map(|report| ReportView {
                report_html: markdown::to_html(&report.report),
                file_name: report_file_name(&report.title),
                word_count: report.word_count(),
                title: report.title,
                outline: report.outline,
                report: report.report,
                sources: report.sources,
            }),
            facts: state.facts.records().to_vec(),
            error: state.error,
        }
    }
}

fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiError {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/research", get(research_state).post(start_research))
        .route("/api/report/download", get(download_report))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    Json(Health {
        status: "ok",
        version: state.version,
    })
}

async fn start_research(
    State(state): State<SharedState>,
    Json(req): Json<StartResearch>,
) -> Response {
    let ticket = match state.session.begin_run(&req.topic).await {
        Ok(ticket) => ticket,
        Err(e @ RunError::EmptyTopic) => return api_error(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e @ RunError::Busy) => return api_error(StatusCode::CONFLICT, e.to_string()),
    };
    info!(run_id = %ticket.run_id, topic = %ticket.topic, "research run started");

    let started = RunStarted {
        run_id: ticket.run_id.to_string(),
        topic: ticket.topic.clone(),
    };
    let orchestrator = state.orchestrator.clone();
    let run = tokio::spawn(async move {
        // 失败已记录在会话状态中
        let _ = orchestrator.execute(ticket).await;
    });
    // 运行任务panic时释放会话，否则running永远为true
    let session = state.session.clone();
    tokio::spawn(async move {
        if let Err(join_error) = run.await {
            error!(error = %join_error, "research run aborted");
            session.fail(format!("research run aborted: {join_error}")).await;
        }
    });

    (StatusCode::ACCEPTED, Json(started)).into_response()
}

async fn research_state(State(state): State<SharedState>) -> impl IntoResponse {
    Json(StateView::from(state.session.snapshot().await))
}

async fn download_report(State(state): State<SharedState>) -> Response {
    let Some(report) = state.session.report().await else {
        warn!("download requested before a report exists");
        return api_error(StatusCode::NOT_FOUND, "no report available yet");
    };

    let disposition = content_disposition(&report_file_name(&report.title));
    (
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.report,
    )
        .into_response()
}

/// RFC 6266附件头：ASCII回退名 + UTF-8编码的filename*
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            ' '..='~' if c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}
