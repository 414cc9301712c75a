//! Application state for the SplitIt API

use std::collections::HashMap;

use splitit_recognizer::RecognizerClient;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::AnalysisJob;

pub struct AppState {
    pub recognizer: RecognizerClient,
    /// In-flight and terminal jobs for the decoupled submit/status pair.
    /// Process memory only; jobs do not survive a restart, and a terminal
    /// job is evicted when its result is delivered.
    pub jobs: RwLock<HashMap<Uuid, AnalysisJob>>,
}

impl AppState {
    pub fn new(recognizer: RecognizerClient) -> Self {
        Self {
            recognizer,
            jobs: RwLock::new(HashMap::new()),
        }
    }
}
