use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::research::types::ResearchReport;

/// 由报告标题生成下载/保存用的文件名，空格替换为下划线，控制字符被去掉
pub fn report_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            ' ' | '/' | '\\' | '"' => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "Research_Report.md".to_string()
    } else {
        format!("{}.md", stem)
    }
}

pub trait Outlet {
    async fn save(&self, report: &ResearchReport) -> Result<PathBuf>;
}

/// 把报告正文写入输出目录
pub struct DiskOutlet {
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, report: &ResearchReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {:?}", self.output_dir)
        })?;

        let output_file_path = self.output_dir.join(report_file_name(&report.title));
        fs::write(&output_file_path, &report.report)
            .with_context(|| format!("Failed to write report {:?}", output_file_path))?;

        info!(path = %output_file_path.display(), "report saved");
        Ok(output_file_path)
    }
}
