//! Recognizer configuration
//!
//! Passed explicitly into [`RecognizerClient::new`](crate::RecognizerClient::new);
//! there is no process-wide singleton. The caller owns where the values come
//! from (env, file, test fixture).

use std::path::PathBuf;
use std::time::Duration;

/// Delay between status polls, matching the reference behavior
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default attempt budget (~5 minutes at the default interval)
pub const DEFAULT_MAX_POLLS: u32 = 100;

/// Connection settings and polling policy for the remote recognizer
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    /// Base service endpoint, e.g. `https://myresource.cognitiveservices.azure.com`
    pub endpoint: String,
    /// Subscription credential sent with every request
    pub api_key: String,
    /// Fixed delay between consecutive status polls (no backoff)
    pub poll_interval: Duration,
    /// Maximum number of status polls before giving up
    pub max_polls: u32,
    /// When set, terminal raw results are written here verbatim for
    /// diagnostics; write failures never affect the analysis outcome
    pub dump_dir: Option<PathBuf>,
}

impl RecognizerConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
            dump_dir: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn with_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_bounded() {
        let config = RecognizerConfig::new("https://example.test", "key");
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.max_polls, 100);
        assert!(config.dump_dir.is_none());
    }

    #[test]
    fn test_builders_override_policy() {
        let config = RecognizerConfig::new("https://example.test", "key")
            .with_poll_interval(Duration::from_millis(50))
            .with_max_polls(5)
            .with_dump_dir("/tmp/dumps");
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.max_polls, 5);
        assert_eq!(config.dump_dir.unwrap(), PathBuf::from("/tmp/dumps"));
    }
}
