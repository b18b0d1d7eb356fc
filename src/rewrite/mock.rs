use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::error::LlmError;
use super::llm::{Completion, CompletionModel, CompletionRequest};

/// Canned-reply [`CompletionModel`] for tests.
#[derive(Debug)]
pub struct MockCompletion {
    reply: Option<String>,
    tokens_used: u64,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockCompletion {
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            tokens_used: 42,
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            ..Self::with_reply("")
        }
    }

    pub fn with_tokens(mut self, tokens_used: u64) -> Self {
        self.tokens_used = tokens_used;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().clone()
    }
}

impl CompletionModel for MockCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Some(text) => Ok(Completion {
                text: text.clone(),
                tokens_used: self.tokens_used,
            }),
            None => Err(LlmError::RequestFailed {
                reason: "mock completion configured to fail".to_string(),
            }),
        }
    }
}
