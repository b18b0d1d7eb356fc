use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatResponse};
use tracing::{debug, instrument};

use super::error::LlmError;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub tokens_used: u64,
}

/// Chat completion service used by the query rewriter.
pub trait CompletionModel: Send + Sync {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<Completion, LlmError>> + Send;
}

/// [`CompletionModel`] backed by `genai`; provider credentials come from its environment
/// lookup (`OPENAI_API_KEY` for OpenAI models).
#[derive(Clone)]
pub struct GenaiCompletion {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiCompletion")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenaiCompletion {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionModel for GenaiCompletion {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let chat = ChatRequest::new(vec![
            ChatMessage::system(request.system_prompt.as_str()),
            ChatMessage::user(request.user_prompt.as_str()),
        ]);
        let options = ChatOptions::default()
            .with_temperature(request.temperature)
            .with_max_tokens(request.max_tokens);

        let response = self
            .client
            .exec_chat(&self.model, chat, Some(&options))
            .await?;

        let tokens_used = usage_tokens(&response)
            .unwrap_or_else(|| estimate_tokens(&request.system_prompt, &request.user_prompt));
        let text = response
            .first_text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse)?;

        debug!(tokens_used, reply_len = text.len(), "Completion received");
        Ok(Completion { text, tokens_used })
    }
}

fn usage_tokens(response: &ChatResponse) -> Option<u64> {
    let usage = &response.usage;
    let total = usage.total_tokens.or_else(|| {
        match (usage.prompt_tokens, usage.completion_tokens) {
            (None, None) => None,
            (p, c) => Some(p.unwrap_or(0) + c.unwrap_or(0)),
        }
    })?;
    u64::try_from(total).ok()
}

/// Rough token count (about four characters per token) for providers that report no usage.
pub fn estimate_tokens(system_prompt: &str, user_prompt: &str) -> u64 {
    let chars = system_prompt.chars().count() + user_prompt.chars().count();
    chars.div_ceil(4) as u64
}
