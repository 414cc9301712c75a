//! HTTP handlers for the SplitIt API

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use splitit_core::ReceiptRecord;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{AnalysisJob, JobStatus, JobStatusResponse, JobSubmitResponse};
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Analyze a receipt image and wait for the result.
///
/// The connection stays open for the recognizer's bounded polling window;
/// clients that cannot hold a request that long should use the
/// submit/status pair instead.
pub async fn analyze_receipt(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ReceiptRecord>, ApiError> {
    let image = read_upload(multipart).await?;

    tracing::info!(bytes = image.len(), "analyzing receipt upload");
    let record = run_pipeline(&state, image).await?;

    Ok(Json(record))
}

/// Submit a receipt image for background analysis.
///
/// Returns a job id immediately; the pipeline runs in a spawned task and
/// the terminal result is fetched exactly once through `get_receipt_job`.
pub async fn submit_receipt(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<JobSubmitResponse>), ApiError> {
    let image = read_upload(multipart).await?;

    let id = Uuid::new_v4();
    state.jobs.write().await.insert(id, AnalysisJob::new(id));

    let task_state = state.clone();
    tokio::spawn(async move {
        let outcome = run_pipeline(&task_state, image).await;
        let mut jobs = task_state.jobs.write().await;
        if let Some(job) = jobs.get_mut(&id) {
            match outcome {
                Ok(record) => {
                    job.status = JobStatus::Succeeded;
                    job.receipt = Some(record);
                }
                Err(e) => {
                    tracing::warn!(job = %id, "receipt analysis failed: {}", e);
                    job.status = JobStatus::Failed;
                    job.error = Some(e.to_string());
                }
            }
        }
    });

    tracing::info!(job = %id, "accepted receipt for background analysis");

    Ok((
        StatusCode::ACCEPTED,
        Json(JobSubmitResponse {
            id,
            status: JobStatus::Pending,
        }),
    ))
}

/// Get the status or terminal result of a submitted job.
///
/// Terminal results are delivered once: the job is removed from the store
/// together with its response, so the map cannot grow with completed
/// uploads. Pending jobs stay until their pipeline finishes.
pub async fn get_receipt_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobStatusResponse>, ApiError> {
    let mut jobs = state.jobs.write().await;
    let job = jobs.get(&id).ok_or(ApiError::JobNotFound(id))?;
    let terminal = job.status != JobStatus::Pending;
    let response = JobStatusResponse::from(job);
    if terminal {
        jobs.remove(&id);
    }
    Ok(Json(response))
}

// submit → poll → normalize; each upload runs this sequentially and
// independently of any other request.
async fn run_pipeline(state: &AppState, image: Vec<u8>) -> Result<ReceiptRecord, ApiError> {
    let raw = state.recognizer.analyze(image).await?;
    let record = splitit_core::normalize(&raw)?;
    Ok(record)
}

// Take the first non-empty part of the upload as the image bytes.
async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))?
    {
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
        if !data.is_empty() {
            return Ok(data.to_vec());
        }
    }
    Err(ApiError::MissingFile)
}
