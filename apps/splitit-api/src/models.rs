//! Data models for the SplitIt API

use chrono::{DateTime, Utc};
use serde::Serialize;
use splitit_core::ReceiptRecord;
use uuid::Uuid;

/// Lifecycle state of a submitted analysis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One submitted receipt image tracked by the in-memory job store
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub status: JobStatus,
    pub receipt: Option<ReceiptRecord>,
    pub error: Option<String>,
}

impl AnalysisJob {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            submitted_at: Utc::now(),
            status: JobStatus::Pending,
            receipt: None,
            error: None,
        }
    }
}

/// Response to a job submission
#[derive(Debug, Clone, Serialize)]
pub struct JobSubmitResponse {
    pub id: Uuid,
    pub status: JobStatus,
}

/// Response to a job status query
#[derive(Debug, Clone, Serialize)]
pub struct JobStatusResponse {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ReceiptRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&AnalysisJob> for JobStatusResponse {
    fn from(job: &AnalysisJob) -> Self {
        Self {
            id: job.id,
            submitted_at: job.submitted_at,
            status: job.status,
            receipt: job.receipt.clone(),
            error: job.error.clone(),
        }
    }
}
