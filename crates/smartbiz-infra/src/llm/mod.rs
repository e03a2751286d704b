//! LLM provider implementations.

pub mod openai_compat;

use secrecy::{ExposeSecret, SecretString};

use smartbiz_core::llm::box_provider::BoxLlmProvider;
use smartbiz_types::config::LlmConfig;

use self::openai_compat::OpenAiCompatibleProvider;

/// Build the text/vision provider from config and the OpenAI API key.
pub fn create_provider(llm: &LlmConfig, api_key: &SecretString) -> BoxLlmProvider {
    let config = openai_compat::config::from_llm_config(api_key.expose_secret(), llm);
    tracing::debug!(provider = %config.provider_name, base_url = %config.base_url, "Configured LLM provider");
    BoxLlmProvider::new(OpenAiCompatibleProvider::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_default_endpoint() {
        let provider = create_provider(&LlmConfig::default(), &SecretString::from("sk-test".to_string()));
        assert_eq!(provider.name(), "openai");
        assert!(provider.capabilities().vision);
    }
}
