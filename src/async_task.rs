use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::summary::CodeIntelSummary;

#[derive(Debug, Clone)]
pub enum Task {
    LoadSummary { source: PathBuf },
    /// Load the same source again after the user asked for fresh data
    Reload { source: PathBuf },
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    SummaryLoaded { summary: CodeIntelSummary },
    Error { message: String },
}

pub async fn run_worker(
    mut task_receiver: mpsc::Receiver<Task>,
    result_sender: mpsc::Sender<TaskResult>,
) {
    while let Some(task) = task_receiver.recv().await {
        let result = match task {
            Task::LoadSummary { source } | Task::Reload { source } => match load_summary(source).await {
                Ok(summary) => TaskResult::SummaryLoaded { summary },
                Err(e) => {
                    log::error!("📥 worker: summary load failed: {}", e);
                    TaskResult::Error { message: e.to_string() }
                }
            },
        };

        if result_sender.send(result).await.is_err() {
            // Main loop has dropped the receiver, exit worker
            break;
        }
    }
}

pub async fn load_summary(source: PathBuf) -> crate::error::Result<CodeIntelSummary> {
    if source.as_os_str() == "-" {
        // stdin is a blocking reader
        return tokio::task::spawn_blocking(move || crate::summary::load_summary(&source))
            .await
            .map_err(|e| crate::error::DashboardError::from(e.to_string()))?;
    }

    let content = tokio::fs::read_to_string(&source).await?;
    let summary = CodeIntelSummary::from_json(&content)?;
    log::info!(
        "📥 worker: loaded {} recent indexes from {:?}",
        summary.recent_activity.len(),
        source
    );
    Ok(summary)
}
