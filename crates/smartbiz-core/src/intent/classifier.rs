//! LLM-backed intent classification.
//!
//! One completion call labels a message `{intent, type}`. Classification is
//! a best-effort hint: every failure (provider error, timeout, missing or
//! malformed JSON) collapses to `{chat, none}` and is never returned as an
//! error.

use serde_json::Value;
use tracing::{debug, warn};

use smartbiz_types::intent::Intent;
use smartbiz_types::llm::{CompletionRequest, Message};

use crate::llm::box_provider::BoxLlmProvider;

const CLASSIFIER_SYSTEM_PROMPT: &str = "Classify the user message. Return ONLY valid JSON.";

const CLASSIFIER_MAX_TOKENS: u32 = 100;

fn classifier_prompt(message: &str) -> String {
    format!(
        "Schema:\n{{\n  \"intent\": \"chat | image | content\",\n  \"type\": \"email | post | caption | code | image | none\"\n}}\n\nMessage:\n\"{message}\""
    )
}

/// Classify `message`. Never fails.
#[tracing::instrument(name = "classify_intent", skip(provider, message), fields(model = %model))]
pub async fn classify_intent(provider: &BoxLlmProvider, model: &str, message: &str) -> Intent {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user(classifier_prompt(message))],
        system: Some(CLASSIFIER_SYSTEM_PROMPT.to_string()),
        max_tokens: CLASSIFIER_MAX_TOKENS,
        temperature: Some(0.0),
    };

    let response = match provider.complete(&request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Intent classification failed, defaulting to chat");
            return Intent::fallback();
        }
    };

    let intent = parse_intent(&response.content);
    debug!(intent = %intent, "Classified message");
    intent
}

/// Parse a classifier reply into an [`Intent`], falling back on any defect.
pub fn parse_intent(raw: &str) -> Intent {
    let Some(object) = first_json_object(raw) else {
        return Intent::fallback();
    };
    match serde_json::from_str::<Value>(object) {
        Ok(Value::Object(map)) => Intent::coerce(
            map.get("intent").and_then(Value::as_str),
            map.get("type").and_then(Value::as_str),
        ),
        _ => Intent::fallback(),
    }
}

/// The first balanced `{...}` span in `text`, ignoring braces inside string literals.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartbiz_types::intent::{IntentKind, IntentTarget};
    use smartbiz_types::llm::LlmError;

    use crate::testing::ScriptedLlm;

    #[test]
    fn test_parse_plain_json() {
        let intent = parse_intent(r#"{"intent": "content", "type": "caption"}"#);
        assert_eq!(intent, Intent::new(IntentKind::Content, IntentTarget::Caption));
    }

    #[test]
    fn test_parse_json_wrapped_in_prose_and_fences() {
        let raw = "Sure! Here you go:\n```json\n{\"intent\":\"image\",\"type\":\"image\"}\n```\nAnything else?";
        let intent = parse_intent(raw);
        assert_eq!(intent, Intent::new(IntentKind::Image, IntentTarget::Image));
    }

    #[test]
    fn test_parse_missing_braces_falls_back() {
        assert_eq!(parse_intent("intent: content"), Intent::fallback());
        assert_eq!(parse_intent(""), Intent::fallback());
    }

    #[test]
    fn test_parse_malformed_json_falls_back() {
        assert_eq!(parse_intent("{intent: content, type: email}"), Intent::fallback());
        assert_eq!(parse_intent("{\"intent\": \"content\""), Intent::fallback());
    }

    #[test]
    fn test_parse_unknown_labels_are_coerced() {
        let intent = parse_intent(r#"{"intent": "CONTENT", "type": "tweet"}"#);
        assert_eq!(intent, Intent::new(IntentKind::Content, IntentTarget::None));
    }

    #[test]
    fn test_first_json_object_skips_braces_in_strings() {
        let raw = r#"note {"intent": "chat", "type": "none", "why": "has } brace"} trailing {"x":1}"#;
        let object = first_json_object(raw).unwrap();
        assert!(object.ends_with("brace\"}"));
        assert!(serde_json::from_str::<Value>(object).is_ok());
    }

    #[test]
    fn test_first_json_object_nested() {
        let raw = r#"{"a": {"b": 1}, "intent": "image"} extra"#;
        assert_eq!(first_json_object(raw).unwrap(), r#"{"a": {"b": 1}, "intent": "image"}"#);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let llm = ScriptedLlm::new(vec![Err(LlmError::Timeout { seconds: 60 })]);
        let provider = llm.boxed();

        let intent = classify_intent(&provider, "gpt-4.1-mini", "hello").await;
        assert_eq!(intent, Intent::fallback());
    }

    #[tokio::test]
    async fn test_classifier_request_shape() {
        let llm = ScriptedLlm::new(vec![Ok(r#"{"intent":"content","type":"email"}"#.to_string())]);
        let provider = llm.boxed();

        let intent = classify_intent(&provider, "gpt-4.1-mini", "email our customers").await;
        assert_eq!(intent, Intent::new(IntentKind::Content, IntentTarget::Email));

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(0.0));
        assert_eq!(requests[0].max_tokens, 100);
        assert_eq!(requests[0].system.as_deref(), Some(CLASSIFIER_SYSTEM_PROMPT));
        assert!(requests[0].messages[0].content.ends_with("Message:\n\"email our customers\""));
    }
}
