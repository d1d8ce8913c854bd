use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::path;

/// Code intelligence summary for a single repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeIntelSummary {
    #[serde(default)]
    pub last_index_scan: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_upload_retention_scan: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recent_activity: Vec<PreciseIndex>,
    #[serde(default)]
    pub available_indexers: Vec<InferredAvailableIndexers>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreciseIndex {
    pub id: String,
    #[serde(default)]
    pub project_root: Option<ProjectRoot>,
    #[serde(default)]
    pub input_commit: String,
    #[serde(default)]
    pub input_root: String,
    #[serde(default)]
    pub input_indexer: String,
    #[serde(default)]
    pub indexer: Option<CodeIntelIndexer>,
    pub state: PreciseIndexState,
    #[serde(default)]
    pub queued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub indexing_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub indexing_finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub processing_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub processing_finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub place_in_queue: Option<u32>,
}

impl PreciseIndex {
    /// The normalized root this index covers, preferring the resolved project root
    pub fn root(&self) -> String {
        match &self.project_root {
            Some(project_root) if !project_root.path.is_empty() => path::sanitize(&project_root.path),
            _ => path::sanitize(&self.input_root),
        }
    }

    /// The indexer name, preferring the resolved indexer over the requested one
    pub fn indexer_name(&self) -> &str {
        self.indexer
            .as_ref()
            .map(|indexer| indexer.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.input_indexer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRoot {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeIntelIndexer {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreciseIndexState {
    UploadingIndex,
    QueuedForIndexing,
    Indexing,
    IndexingErrored,
    QueuedForProcessing,
    Processing,
    ProcessingErrored,
    Completed,
    Deleting,
    Deleted,
    #[serde(other)]
    Unknown,
}

/// Indexers inferred as applicable to a set of roots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferredAvailableIndexers {
    #[serde(default)]
    pub roots: Vec<String>,
    pub index: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("GraphQL error: {0}")]
    Query(String),

    #[error("Repository not found")]
    RepositoryNotFound,

    #[error("Repository has no code intelligence summary")]
    MissingSummary,

    #[error("Malformed summary: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(default)]
    repository: Option<RepositoryData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryData {
    #[serde(default)]
    code_intel_summary: Option<CodeIntelSummary>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl CodeIntelSummary {
    /// Parse a summary from either a bare summary object or a full GraphQL
    /// response envelope (`{"data": {"repository": {"codeIntelSummary": ...}}}`).
    pub fn from_json(content: &str) -> Result<Self, SummaryError> {
        let value: serde_json::Value = serde_json::from_str(content)?;

        let is_envelope = value
            .as_object()
            .map(|object| object.contains_key("data") || object.contains_key("errors"))
            .unwrap_or(false);
        if !is_envelope {
            return Ok(serde_json::from_value(value)?);
        }

        let response: GraphQlResponse = serde_json::from_value(value)?;
        if !response.errors.is_empty() {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(SummaryError::Query(messages.join("; ")));
        }

        response
            .data
            .and_then(|data| data.repository)
            .ok_or(SummaryError::RepositoryNotFound)?
            .code_intel_summary
            .ok_or(SummaryError::MissingSummary)
    }
}

/// Read and parse a summary file; `-` reads from stdin
pub fn load_summary(path: &Path) -> crate::error::Result<CodeIntelSummary> {
    let content = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };

    let summary = CodeIntelSummary::from_json(&content)?;
    log::info!(
        "📥 load_summary: {} recent indexes, {} available indexer groups from {:?}",
        summary.recent_activity.len(),
        summary.available_indexers.len(),
        path
    );
    Ok(summary)
}
