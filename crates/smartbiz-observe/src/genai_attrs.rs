//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! `tracing` span macros need field names as literals, so providers spell
//! these out inline; the constants here are the reference list and back the
//! span-name helper. Span naming convention: `"{operation} {model}"`
//! (e.g. `"chat gpt-4o-mini"`).

// --- Required attributes ---

/// The name of the operation being performed (e.g. "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g. "openai").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

// --- Agent-specific attributes ---

/// The SmartBiz agent handling the turn.
pub const GEN_AI_AGENT_ID: &str = "gen_ai.agent.id";

// --- Operation name values ---

/// Chat completion, including vision and classification calls.
pub const OP_CHAT: &str = "chat";

/// Text-to-image generation.
pub const OP_GENERATE_IMAGE: &str = "generate_image";

/// Image-to-image editing.
pub const OP_EDIT_IMAGE: &str = "edit_image";

// --- Provider name values ---

pub const PROVIDER_OPENAI: &str = "openai";
pub const PROVIDER_POLLINATIONS: &str = "pollinations";
pub const PROVIDER_MODELSLAB: &str = "modelslab";

/// Build a span name following the `"{operation} {model}"` convention.
pub fn span_name(operation: &str, model: &str) -> String {
    if model.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} {model}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_name_joins_operation_and_model() {
        assert_eq!(span_name(OP_CHAT, "gpt-4o-mini"), "chat gpt-4o-mini");
        assert_eq!(span_name(OP_GENERATE_IMAGE, ""), "generate_image");
    }

    #[test]
    fn attribute_names_share_the_gen_ai_namespace() {
        for name in [
            GEN_AI_OPERATION_NAME,
            GEN_AI_PROVIDER_NAME,
            GEN_AI_REQUEST_MODEL,
            GEN_AI_REQUEST_TEMPERATURE,
            GEN_AI_REQUEST_MAX_TOKENS,
            GEN_AI_USAGE_INPUT_TOKENS,
            GEN_AI_USAGE_OUTPUT_TOKENS,
            GEN_AI_AGENT_ID,
        ] {
            assert!(name.starts_with("gen_ai."), "{name}");
        }
    }
}
