use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("completion returned no text")]
    EmptyResponse,

    #[error("completion exceeded {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("unparseable rewrite reply: {reason}")]
    MalformedReply { reason: String },
}

impl From<genai::Error> for LlmError {
    fn from(err: genai::Error) -> Self {
        LlmError::RequestFailed {
            reason: err.to_string(),
        }
    }
}
