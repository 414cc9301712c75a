//! Remote document recognizer integration
//!
//! Two pieces: the submission client (binary POST, 202 + Operation-Location
//! contract) and the completion poller (fixed-interval, bounded). Both are
//! configured through an explicit [`RecognizerConfig`] value.

pub mod client;
pub mod config;
pub mod error;

pub use client::{OperationRef, RecognizerClient};
pub use config::RecognizerConfig;
pub use error::RecognizerError;
