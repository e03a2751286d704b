//! Business profile CLI commands: create, show.

use anyhow::Result;
use console::style;

use smartbiz_types::business::{Business, BusinessId, BusinessPatch};

use crate::cli::parse_id;
use crate::state::AppState;

/// Create a business profile from flags.
pub async fn create_business(state: &AppState, patch: BusinessPatch, json: bool) -> Result<()> {
    let business = state.agent_service.create_business(patch).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&business)?);
        return Ok(());
    }

    println!();
    println!("  {} Business created!", style("✓").green().bold());
    print_business(&business);
    println!(
        "  Create an agent: {}",
        style(format!("smartbiz agent create --name <NAME> --business {}", business.id)).yellow()
    );
    println!();
    Ok(())
}

pub async fn show_business(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id: BusinessId = parse_id(id, "business")?;
    let business = state.agent_service.get_business(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&business)?);
        return Ok(());
    }

    print_business(&business);
    println!();
    Ok(())
}

fn print_business(business: &Business) {
    let field = |value: Option<&String>| match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => style("-").dim().to_string(),
    };

    println!();
    println!("  {}  {}", style("Name:").bold(), style(&business.name).cyan());
    println!("  {}  {}", style("Industry:").bold(), field(business.industry.as_ref()));
    println!("  {}  {}", style("Audience:").bold(), field(business.target_audience.as_ref()));
    println!("  {}  {}", style("Tone:").bold(), field(business.brand_tone.as_ref()));
    println!("  {}  {}", style("ID:").bold(), style(business.id.to_string()).dim());
    println!();
}
