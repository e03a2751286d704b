//! Agent lifecycle CLI commands: create, show, list, delete.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use smartbiz_types::agent::{Agent, AgentId};
use smartbiz_types::business::BusinessId;

use crate::cli::parse_id;
use crate::state::AppState;

/// Create an agent, seeding its memory from the business when given.
pub async fn create_agent(
    state: &AppState,
    name: &str,
    business: Option<&str>,
    json: bool,
) -> Result<()> {
    let business_id = business
        .map(|id| parse_id::<BusinessId>(id, "business"))
        .transpose()?;
    let agent = state.agent_service.create_agent(name, business_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agent)?);
        return Ok(());
    }

    println!();
    println!("  {} Agent created!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Name:").bold(), style(&agent.agent_name).cyan());
    println!("  {}  {}", style("ID:").bold(), style(agent.id.to_string()).dim());
    if agent.memory.is_empty() {
        println!(
            "  {}",
            style("No business profile; memory starts empty.").dim()
        );
    }
    println!();
    println!(
        "  Say hello: {}",
        style(format!("smartbiz chat {} \"hello\"", agent.id)).yellow()
    );
    println!();
    Ok(())
}

pub async fn show_agent(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id: AgentId = parse_id(id, "agent")?;
    let agent = state.agent_service.get_agent(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agent)?);
        return Ok(());
    }

    println!();
    println!("  {}  {}", style("Name:").bold(), style(&agent.agent_name).cyan());
    println!("  {}  {}", style("ID:").bold(), style(agent.id.to_string()).dim());
    match &agent.business_id {
        Some(business_id) => println!("  {}  {}", style("Business:").bold(), business_id),
        None => println!("  {}  {}", style("Business:").bold(), style("none").dim()),
    }
    println!();
    if !agent.memory.is_empty() {
        for line in agent.memory.lines() {
            println!("  {}", style(line).dim());
        }
        println!();
    }
    Ok(())
}

/// List a business's agents in a table.
pub async fn list_agents(state: &AppState, business: &str, json: bool) -> Result<()> {
    let business_id: BusinessId = parse_id(business, "business")?;
    let agents = state.agent_service.list_agents_for_business(&business_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agents)?);
        return Ok(());
    }

    if agents.is_empty() {
        println!();
        println!(
            "  {} No agents yet. Create one with: {}",
            style("i").blue().bold(),
            style(format!("smartbiz agent create --name <NAME> --business {business_id}")).yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", agent_table(&agents));
    println!();
    println!(
        "  {} agent{}",
        style(agents.len()).bold(),
        if agents.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

pub async fn delete_agent(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id: AgentId = parse_id(id, "agent")?;
    state.agent_service.delete_agent(&id).await?;

    if json {
        println!("{}", serde_json::json!({"deleted": true, "id": id}));
    } else {
        println!("  {} Agent {} deleted", style("✓").green().bold(), style(id).dim());
    }
    Ok(())
}

fn agent_table(agents: &[Agent]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for agent in agents {
        table.add_row(vec![
            Cell::new(&agent.agent_name).fg(Color::Cyan),
            Cell::new(agent.id.to_string()).fg(Color::DarkGrey),
            Cell::new(agent.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_row_per_agent() {
        let agents = vec![Agent::new("Nova", None), Agent::new("Echo", None)];
        let rendered = agent_table(&agents).to_string();
        assert!(rendered.contains("Nova"));
        assert!(rendered.contains("Echo"));
    }
}
