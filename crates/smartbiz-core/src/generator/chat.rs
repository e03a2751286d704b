use smartbiz_types::llm::{CompletionRequest, LlmError, Message};

use super::Generation;
use crate::llm::box_provider::BoxLlmProvider;

pub const CHAT_TEMPERATURE: f64 = 0.7;
pub const CHAT_MAX_TOKENS: u32 = 600;

/// Reply to `text` with no system prompt and no history.
#[tracing::instrument(name = "generate_chat", skip(provider, text), fields(model = %model))]
pub async fn generate_chat(
    provider: &BoxLlmProvider,
    model: &str,
    text: &str,
) -> Result<Generation, LlmError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user(text)],
        system: None,
        max_tokens: CHAT_MAX_TOKENS,
        temperature: Some(CHAT_TEMPERATURE),
    };

    let response = provider.complete(&request).await?;
    Ok(Generation::text(response.content, response.usage))
}
