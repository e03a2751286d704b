//! Wiring of concrete providers into the core [`Providers`] bundle.

use anyhow::{Context, Result};

use smartbiz_core::image::box_provider::{BoxImageEditProvider, BoxTextToImageProvider};
use smartbiz_core::providers::Providers;
use smartbiz_core::storage::box_store::BoxObjectStore;
use smartbiz_types::config::GlobalConfig;

use crate::config::{Credentials, OPENAI_API_KEY};
use crate::image::modelslab::ModelslabEditProvider;
use crate::image::pollinations::PollinationsProvider;
use crate::llm::create_provider;
use crate::storage::cloudinary::{CloudinaryCredentials, CloudinaryStore};

/// Build every provider the engine needs.
///
/// The OpenAI key is required. Without an edit key or a Cloudinary URL the
/// image-edit route is disabled and answers with a configuration error.
pub fn build_providers(config: &GlobalConfig, credentials: &Credentials) -> Result<Providers> {
    let api_key = credentials
        .openai_api_key
        .as_ref()
        .with_context(|| format!("{OPENAI_API_KEY} is not set"))?;
    let llm = create_provider(&config.llm, api_key);

    let text_to_image = BoxTextToImageProvider::new(
        PollinationsProvider::new(&config.image.generation_base_url)
            .context("invalid image.generation_base_url")?,
    );

    let image_edit = match credentials.edit_api_key.as_ref() {
        Some(key) => Some(BoxImageEditProvider::new(ModelslabEditProvider::new(
            key,
            &config.image.edit_endpoint,
            config.image.edit_timeout_secs,
        )?)),
        None => {
            tracing::warn!("STABLE_DIFFUSION_API_KEY is not set, image editing disabled");
            None
        }
    };

    let object_store = match credentials.cloudinary_url.as_ref() {
        Some(url) => {
            let creds = CloudinaryCredentials::from_url(url)?;
            Some(BoxObjectStore::new(CloudinaryStore::new(creds, config.image.upload_timeout_secs)?))
        }
        None => {
            tracing::warn!("CLOUDINARY_URL is not set, image editing disabled");
            None
        }
    };

    Ok(Providers {
        llm,
        text_to_image,
        image_edit,
        object_store,
    })
}
