use smartbiz_types::business::Business;
use smartbiz_types::error::ImageError;

use super::Generation;
use crate::image::box_provider::BoxTextToImageProvider;

pub fn enhance_prompt(prompt: &str, business: Option<&Business>) -> String {
    let name = business.map(|b| b.name.as_str()).unwrap_or("");
    let tone = business
        .and_then(|b| b.brand_tone.as_deref())
        .filter(|t| !t.is_empty())
        .unwrap_or("neutral");
    format!("{prompt}\nBrand: {name}\nStyle: {tone}\nNo humans unless explicitly requested.")
}

/// Generate a brand-styled image for `prompt`.
#[tracing::instrument(name = "generate_image", skip_all, fields(provider = %provider.name()))]
pub async fn generate_image(
    provider: &BoxTextToImageProvider,
    prompt: &str,
    business: Option<&Business>,
) -> Result<Generation, ImageError> {
    let image = provider.generate(&enhance_prompt(prompt, business)).await?;
    Ok(Generation {
        message: format!("Generated image for: {prompt}"),
        media: vec![image.url],
        usage: None,
    })
}
