use std::borrow::Cow;
use std::fmt::Display;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

/// 智能体类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentType {
    Triage,
    QueryRewriting,
    Research,
    Editor,
}

impl AgentType {
    pub const ALL: [AgentType; 4] = [
        AgentType::Triage,
        AgentType::QueryRewriting,
        AgentType::Research,
        AgentType::Editor,
    ];

    /// 展示给模型与界面的名称
    pub fn name(&self) -> &'static str {
        match self {
            AgentType::Triage => "Triage Agent",
            AgentType::QueryRewriting => "Query Rewriting Agent",
            AgentType::Research => "Research Agent",
            AgentType::Editor => "Editor Agent",
        }
    }
}

impl Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .into_iter()
            .find(|agent| agent.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown agent: {}", s))
    }
}

/// 调研过程中保存的关键事实
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub fact: String,
    pub source: String,
    /// 本地时间，格式为 HH:MM:SS
    pub timestamp: String,
}

/// 分诊Agent产出的调研计划
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchPlan {
    /// 调研主题
    pub topic: String,
    /// 按优先级排列的搜索查询
    pub search_queries: Vec<String>,
    /// 需要重点关注的方向
    pub focus_areas: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("word_count must be positive, got {0}")]
    NonPositiveWordCount(i64),
}

/// 编辑Agent产出的调研报告，word_count必须为正数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReportPayload")]
pub struct ResearchReport {
    pub title: String,
    pub outline: Vec<String>,
    /// Markdown格式的正文
    pub report: String,
    pub sources: Vec<String>,
    word_count: u64,
}

/// 模型返回的原始报告结构，经校验后转为 ResearchReport
#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct ReportPayload {
    /// 报告标题
    title: String,
    /// 报告大纲，每项为一个章节标题
    outline: Vec<String>,
    /// Markdown格式的报告正文
    report: String,
    /// 引用的来源
    sources: Vec<String>,
    /// Total word count must be positive
    #[schemars(range(min = 1))]
    word_count: i64,
}

impl ResearchReport {
    pub fn new(
        title: impl Into<String>,
        outline: Vec<String>,
        report: impl Into<String>,
        sources: Vec<String>,
        word_count: i64,
    ) -> Result<Self, ReportError> {
        if word_count <= 0 {
            return Err(ReportError::NonPositiveWordCount(word_count));
        }
        let word_count =
            u64::try_from(word_count).map_err(|_| ReportError::NonPositiveWordCount(word_count))?;
        Ok(Self {
            title: title.into(),
            outline,
            report: report.into(),
            sources,
            word_count,
        })
    }

    pub fn word_count(&self) -> u64 {
        self.word_count
    }
}

impl TryFrom<ReportPayload> for ResearchReport {
    type Error = ReportError;

    fn try_from(payload: ReportPayload) -> Result<Self, Self::Error> {
        ResearchReport::new(
            payload.title,
            payload.outline,
            payload.report,
            payload.sources,
            payload.word_count,
        )
    }
}

impl JsonSchema for ResearchReport {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("ResearchReport")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        ReportPayload::json_schema(generator)
    }
}
