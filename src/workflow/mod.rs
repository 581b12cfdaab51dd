use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::RunMode;
use crate::config::Config;
use crate::outlet::{DiskOutlet, Outlet};
use crate::research::Progress;
use crate::web::{AppState, build_router};

pub mod context;

pub use context::AssistantContext;

/// 启动调研助手
pub async fn launch(config: &Config, mode: RunMode) -> Result<()> {
    let context = AssistantContext::new(config.clone())?;

    match mode {
        RunMode::Serve => serve(context).await,
        RunMode::Headless { topic, output_dir } => {
            run_headless(&context, &topic, &output_dir).await
        }
    }
}

/// 启动HTTP服务，直到收到 Ctrl-C
pub async fn serve(context: AssistantContext) -> Result<()> {
    let bind = context.config.server.bind.clone();
    let state = Arc::new(AppState::new(context.orchestrator));
    let app = build_router(state);

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!(addr = %bind, "research assistant listening, open http://{}/", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
    }
}

/// 终端模式：执行一次调研，打印进度并把报告写入输出目录
pub async fn run_headless(
    context: &AssistantContext,
    topic: &str,
    output_dir: &Path,
) -> Result<()> {
    // 启动时检查模型连接
    context.llm_client.check_connection().await?;

    let mut progress_rx = context.session.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(progress) = progress_rx.recv().await {
            println!("{}", progress_line(progress));
            if progress == Progress::Complete {
                break;
            }
        }
    });

    let report = match context.orchestrator.run(topic).await {
        Ok(report) => {
            // 完成信号已发出，等待进度输出结束
            let _ = printer.await;
            report
        }
        Err(e) => {
            printer.abort();
            return Err(e);
        }
    };

    let path = DiskOutlet::new(output_dir).save(&report).await?;
    println!(
        "💾 {} ({} words) saved to {}",
        report.title,
        report.word_count(),
        path.display()
    );
    Ok(())
}

fn progress_line(progress: Progress) -> String {
    let label = match progress {
        Progress::NotStarted => "🔍 Generating research plan...",
        Progress::PlanReady => "📋 Research plan ready",
        Progress::Researching => "📝 Compiling research report...",
        Progress::Complete => "✅ Research complete",
    };
    format!("[{:>3}%] {}", progress.percent(), label)
}

// Include tests
#[cfg(test)]
mod tests;
