//! Image-to-image editing via the Modelslab API.
//!
//! The endpoint takes a public `init_image` URL plus a prompt and answers
//! with JSON whose `output` array holds the result URLs. A queued or failed
//! job answers with no output; that payload is handed back untouched.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use smartbiz_core::image::provider::ImageEditProvider;
use smartbiz_observe::genai_attrs::PROVIDER_MODELSLAB;
use smartbiz_types::error::ImageError;
use smartbiz_types::image::{ImageEditRequest, ImageEditResponse};

/// Modelslab image-to-image client. The API key travels in the JSON body.
pub struct ModelslabEditProvider {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    timeout_secs: u64,
}

impl ModelslabEditProvider {
    pub fn new(api_key: &SecretString, endpoint: &str, timeout_secs: u64) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ImageError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: SecretString::from(api_key.expose_secret().to_string()),
            endpoint: endpoint.to_string(),
            timeout_secs,
        })
    }

    /// Request body. Numeric fields the API expects as strings are sent as strings.
    fn request_body(&self, request: &ImageEditRequest) -> Value {
        let params = &request.params;
        json!({
            "key": self.api_key.expose_secret(),
            "model_id": params.model_id,
            "prompt": request.prompt,
            "init_image": request.init_image_url,
            "width": params.width.to_string(),
            "height": params.height.to_string(),
            "samples": params.samples.to_string(),
            "num_inference_steps": params.num_inference_steps.to_string(),
            "guidance_scale": params.guidance_scale,
            "strength": params.strength,
            "enhance_prompt": "yes",
            "safety_checker": "no",
            "base64": "no",
        })
    }
}

/// First entry of the `output` array, if it is a non-empty string.
fn output_url(raw: &Value) -> Option<String> {
    raw.get("output")
        .and_then(|o| o.get(0))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(String::from)
}

impl ImageEditProvider for ModelslabEditProvider {
    fn name(&self) -> &str {
        PROVIDER_MODELSLAB
    }

    async fn edit(&self, request: &ImageEditRequest) -> Result<ImageEditResponse, ImageError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ImageError::Timeout {
                        seconds: self.timeout_secs,
                    }
                } else {
                    ImageError::Provider(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Provider(format!("HTTP {status}: {body}")));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| ImageError::Provider(format!("invalid edit response: {e}")))?;

        let output_url = output_url(&raw);
        match output_url {
            Some(_) => tracing::info!(model = %request.params.model_id, "Image edit finished"),
            None => tracing::warn!(status = ?raw.get("status"), "Image edit returned no output"),
        }
        Ok(ImageEditResponse { output_url, raw })
    }
}
