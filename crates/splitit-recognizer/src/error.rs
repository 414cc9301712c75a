use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecognizerError {
    /// The service rejected the submission; status and body are forwarded
    /// verbatim so the caller can surface the diagnostic.
    #[error("Submission rejected with HTTP {status}: {body}")]
    Submission { status: u16, body: String },

    /// The service accepted the document but violated the protocol by
    /// omitting the polling location.
    #[error("Accepted response carried no Operation-Location header")]
    MissingOperationLocation,

    /// The service reached a terminal state and reported the analysis as
    /// failed, with whatever diagnostic it supplied.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    /// The job never reached a terminal state within the configured
    /// attempt budget.
    #[error("Analysis still pending after {attempts} status polls")]
    PollBudgetExhausted { attempts: u32 },

    /// Network or decode failure talking to the service; not retried.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
