//! Configuration for the OpenAI-compatible provider.

use smartbiz_observe::genai_attrs::PROVIDER_OPENAI;
use smartbiz_types::config::LlmConfig;
use smartbiz_types::llm::ProviderCapabilities;

/// Settings used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: String,
    /// Model used when a request leaves `model` empty.
    pub model: String,
    /// Upper bound for a single completion call.
    pub timeout_secs: u64,
    pub capabilities: ProviderCapabilities,
}

/// OpenAI defaults: public endpoint, vision capable, 60 second timeout.
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: PROVIDER_OPENAI.into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key: api_key.into(),
        model: model.into(),
        timeout_secs: 60,
        capabilities: ProviderCapabilities {
            vision: true,
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

/// Build the provider config from the `[llm]` section of `config.toml`.
///
/// A base URL other than OpenAI's is reported under the name
/// "openai-compatible".
pub fn from_llm_config(api_key: &str, llm: &LlmConfig) -> OpenAiCompatConfig {
    let defaults = openai_defaults(api_key, &llm.text_model);
    let base_url = llm.base_url.trim_end_matches('/').to_string();
    let provider_name = if base_url == defaults.base_url {
        defaults.provider_name
    } else {
        "openai-compatible".to_string()
    };

    OpenAiCompatConfig {
        provider_name,
        base_url,
        timeout_secs: llm.timeout_secs,
        ..defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_defaults() {
        let config = openai_defaults("sk-test", "gpt-4.1-mini");
        assert_eq!(config.provider_name, "openai");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.capabilities.vision);
    }

    #[test]
    fn test_from_llm_config_custom_endpoint() {
        let llm = LlmConfig {
            base_url: "http://localhost:11434/v1/".into(),
            timeout_secs: 15,
            ..LlmConfig::default()
        };
        let config = from_llm_config("key", &llm);
        assert_eq!(config.provider_name, "openai-compatible");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.model, llm.text_model);
    }

    #[test]
    fn test_from_llm_config_default_endpoint_keeps_name() {
        let config = from_llm_config("key", &LlmConfig::default());
        assert_eq!(config.provider_name, "openai");
    }
}
