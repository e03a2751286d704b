//! Conversation history CLI command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use smartbiz_types::agent::AgentId;
use smartbiz_types::conversation::{MessageWithMedia, SenderRole};

use crate::cli::parse_id;
use crate::state::AppState;

/// Longest message preview shown in the table.
const PREVIEW_CHARS: usize = 80;

/// Print an agent's conversation log, oldest first.
pub async fn history(state: &AppState, agent: &str, json: bool) -> Result<()> {
    let agent_id: AgentId = parse_id(agent, "agent")?;
    let agent = state.agent_service.get_agent(&agent_id).await?;
    let messages = state.agent_service.get_messages(&agent_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages with {} yet.",
            style("i").blue().bold(),
            style(&agent.agent_name).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", history_table(&messages, &agent.agent_name));
    println!();
    Ok(())
}

fn history_table(messages: &[MessageWithMedia], agent_name: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("Message").fg(Color::White),
        Cell::new("Media").fg(Color::White),
    ]);

    for entry in messages {
        let from = match entry.message.role {
            SenderRole::User => Cell::new("you").fg(Color::Green),
            SenderRole::Assistant => Cell::new(agent_name).fg(Color::Cyan),
        };
        table.add_row(vec![
            Cell::new(entry.message.created_at.format("%m-%d %H:%M:%S").to_string()).fg(Color::DarkGrey),
            from,
            Cell::new(preview(&entry.message.text)),
            Cell::new(entry.media.len()),
        ]);
    }
    table
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
