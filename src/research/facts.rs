//! 关键事实存储 - save_important_fact 工具背后的去重列表

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::research::types::FactRecord;

/// 未提供来源时使用的占位值
pub const DEFAULT_SOURCE: &str = "Not specified";
/// 重复保存时返回给模型的提示
pub const DUPLICATE_FACT_MESSAGE: &str = "⚠️ Fact already saved.";

const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// 单次调研运行内收集到的事实，按保存顺序排列，fact文本不重复
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FactStore {
    records: Vec<FactRecord>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以当前本地时间保存事实，返回给模型的确认或警告文本
    pub fn save(&mut self, fact: &str, source: Option<&str>) -> String {
        self.save_at(fact, source, Local::now())
    }

    /// 精确匹配fact文本去重（区分大小写，不做归一化）
    pub fn save_at(&mut self, fact: &str, source: Option<&str>, at: DateTime<Local>) -> String {
        if self.contains(fact) {
            return DUPLICATE_FACT_MESSAGE.to_string();
        }

        let source = source
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE);

        self.records.push(FactRecord {
            fact: fact.to_string(),
            source: source.to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        });
        format!("✅ Fact saved: {}", fact)
    }

    pub fn contains(&self, fact: &str) -> bool {
        self.records.iter().any(|record| record.fact == fact)
    }

    pub fn records(&self) -> &[FactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
