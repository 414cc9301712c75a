//! Remote analysis client and completion poller
//!
//! Talks to the Azure Document Intelligence prebuilt-receipt model:
//! a binary POST returns 202 plus an `Operation-Location` header, and the
//! referenced URL is then polled at a fixed interval until the job reports
//! a terminal status.

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RecognizerConfig;
use crate::error::RecognizerError;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const ANALYZE_PATH: &str = "formrecognizer/documentModels/prebuilt-receipt:analyze";
const API_VERSION: &str = "2023-07-31";

/// Opaque handle to an in-flight analysis job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRef(String);

impl OperationRef {
    pub fn url(&self) -> &str {
        &self.0
    }
}

/// Client for submitting receipt images and awaiting their analysis
///
/// Holds no per-job state; each call is an independent request/response
/// over the shared connection pool, so one client can serve concurrent
/// uploads without coordination.
pub struct RecognizerClient {
    http: reqwest::Client,
    config: RecognizerConfig,
}

impl RecognizerClient {
    pub fn new(config: RecognizerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Submit raw image bytes for analysis.
    ///
    /// No local size or format validation is performed; the service itself
    /// rejects oversized or malformed input and that rejection surfaces as
    /// [`RecognizerError::Submission`] with the original status and body.
    /// Only 202 signals acceptance for async processing; every other
    /// status, 2xx included, is a submission failure.
    pub async fn submit(&self, image: Vec<u8>) -> Result<OperationRef, RecognizerError> {
        let url = format!(
            "{}/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            ANALYZE_PATH,
            API_VERSION,
        );

        let response = self
            .http
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::ACCEPTED {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognizerError::Submission {
                status: status.as_u16(),
                body,
            });
        }

        let location = response
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or(RecognizerError::MissingOperationLocation)?;

        debug!(operation = %location, "analysis accepted");
        Ok(OperationRef(location))
    }

    /// Poll the operation until it reaches a terminal state.
    ///
    /// Any status other than `succeeded` or `failed` counts as still
    /// pending and triggers the fixed inter-poll delay. The loop is
    /// bounded by `max_polls`; dropping the future between polls stops
    /// issuing requests (there is no partial result to deliver).
    pub async fn await_completion(
        &self,
        operation: &OperationRef,
    ) -> Result<Value, RecognizerError> {
        for attempt in 1..=self.config.max_polls {
            let response = self
                .http
                .get(operation.url())
                .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
                .send()
                .await?;
            let document: Value = response.json().await?;

            let status = document.get("status").and_then(Value::as_str).unwrap_or("");
            match status {
                "succeeded" => {
                    debug!(attempt, "analysis succeeded");
                    self.dump_terminal(&document);
                    return Ok(document);
                }
                "failed" => {
                    self.dump_terminal(&document);
                    return Err(RecognizerError::AnalysisFailed(failure_detail(&document)));
                }
                other => {
                    debug!(attempt, status = other, "analysis still pending");
                    if attempt < self.config.max_polls {
                        tokio::time::sleep(self.config.poll_interval).await;
                    }
                }
            }
        }

        Err(RecognizerError::PollBudgetExhausted {
            attempts: self.config.max_polls,
        })
    }

    /// Submit an image and wait for its raw analysis result.
    pub async fn analyze(&self, image: Vec<u8>) -> Result<Value, RecognizerError> {
        let operation = self.submit(image).await?;
        self.await_completion(&operation).await
    }

    // Best-effort diagnostics: the terminal document is written verbatim
    // on a blocking worker and never read back; failures are logged and
    // swallowed, and the main return path does not wait for the write.
    fn dump_terminal(&self, document: &Value) {
        let Some(dir) = self.config.dump_dir.clone() else {
            return;
        };
        let payload = document.to_string();
        tokio::task::spawn_blocking(move || {
            let name = format!(
                "analyze-{}.json",
                chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
            );
            let path = dir.join(name);
            let write =
                std::fs::create_dir_all(&dir).and_then(|_| std::fs::write(&path, payload));
            if let Err(e) = write {
                warn!(path = %path.display(), "failed to dump raw analysis result: {e}");
            }
        });
    }
}

// Forward the service's own diagnostic when it gives one, else the whole
// terminal document.
fn failure_detail(document: &Value) -> String {
    match document.get("error") {
        Some(error) => error.to_string(),
        None => document.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_detail_prefers_error_subtree() {
        let doc = json!({"status": "failed", "error": {"code": "InvalidImage"}});
        assert_eq!(failure_detail(&doc), r#"{"code":"InvalidImage"}"#);
    }

    #[test]
    fn test_failure_detail_falls_back_to_document() {
        let doc = json!({"status": "failed"});
        assert_eq!(failure_detail(&doc), r#"{"status":"failed"}"#);
    }
}
