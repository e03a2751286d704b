//! One-shot chat command: send a turn, print the reply and any media.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use smartbiz_core::chat::orchestrator::TurnRequest;
use smartbiz_core::chat::turn::{TurnResponse, TurnState};
use smartbiz_types::agent::AgentId;
use smartbiz_types::image::ImageInput;

use crate::cli::parse_id;
use crate::state::AppState;

pub async fn chat(
    state: &AppState,
    agent: &str,
    message: Option<String>,
    image: Option<&Path>,
    context: bool,
    json: bool,
) -> Result<()> {
    let agent_id: AgentId = parse_id(agent, "agent")?;
    let text = message.unwrap_or_default();

    let response = if context {
        state.orchestrator.chat_with_context(&agent_id, &text).await?
    } else {
        let image = match image {
            Some(path) => Some(read_image(path).await?),
            None => None,
        };
        state
            .orchestrator
            .handle_turn(&agent_id, TurnRequest { text, image })
            .await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_response(&response);
    Ok(())
}

async fn read_image(path: &Path) -> Result<ImageInput> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image {}", path.display()))?;
    Ok(ImageInput {
        bytes,
        mime_type: mime_for_path(path).to_string(),
    })
}

/// Guess an image mime type from the file extension.
fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

fn print_response(response: &TurnResponse) {
    println!();
    if response.state == TurnState::Failed {
        println!(
            "  {} {}",
            style("✗").red().bold(),
            style(response.error.as_deref().unwrap_or(&response.message)).red()
        );
        println!();
        return;
    }

    println!("  {}", response.message.replace('\n', "\n  "));
    for url in &response.media {
        println!("  {} {}", style("🖼").bold(), style(url).cyan().underlined());
    }
    println!();

    let mut footer = format!("{}", response.route);
    if let Some(content_type) = response.content_type {
        footer.push_str(&format!(" · {content_type}"));
    }
    if let Some(usage) = response.usage {
        footer.push_str(&format!(" · {} tokens", usage.total()));
    }
    println!("  {}", style(footer).dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("shop.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("logo.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("scan")), "image/png");
    }

    #[tokio::test]
    async fn missing_image_file_is_an_error() {
        let err = read_image(Path::new("/nonexistent/photo.png")).await.unwrap_err();
        assert!(err.to_string().contains("failed to read image"));
    }
}
