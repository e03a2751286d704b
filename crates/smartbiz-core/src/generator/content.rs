use smartbiz_types::business::Business;
use smartbiz_types::conversation::ContentType;
use smartbiz_types::llm::{CompletionRequest, LlmError, Message};

use super::Generation;
use crate::llm::box_provider::BoxLlmProvider;

pub const CONTENT_TEMPERATURE: f64 = 0.6;
pub const CONTENT_MAX_TOKENS: u32 = 800;

pub fn content_system_prompt(content_type: ContentType, business: Option<&Business>) -> String {
    let name = business
        .map(|b| b.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("Unknown");
    let tone = business
        .and_then(|b| b.brand_tone.as_deref())
        .filter(|t| !t.is_empty())
        .unwrap_or("neutral");
    format!("You are a professional {content_type} generator.\nBusiness: {name}\nTone: {tone}")
}

/// Generate one piece of `content_type` content for `prompt`.
#[tracing::instrument(
    name = "generate_content",
    skip(provider, prompt, business),
    fields(model = %model, content_type = %content_type)
)]
pub async fn generate_content(
    provider: &BoxLlmProvider,
    model: &str,
    content_type: ContentType,
    prompt: &str,
    business: Option<&Business>,
) -> Result<Generation, LlmError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user(prompt)],
        system: Some(content_system_prompt(content_type, business)),
        max_tokens: CONTENT_MAX_TOKENS,
        temperature: Some(CONTENT_TEMPERATURE),
    };

    let response = provider.complete(&request).await?;
    Ok(Generation::text(response.content, response.usage))
}
