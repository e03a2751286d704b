//! SmartBiz CLI and REST API entry point.
//!
//! Binary name: `smartbiz`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use smartbiz_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use smartbiz_types::business::BusinessPatch;

use cli::{AgentCommand, BusinessCommand, Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "smartbiz", &mut std::io::stdout());
        return Ok(());
    }

    let mut tracing_options = TracingOptions::from_verbosity(cli.verbose);
    tracing_options.otel = cli.otel;
    if let Commands::Serve { log_json, .. } = &cli.command {
        tracing_options.json = *log_json;
        if cli.verbose == 0 {
            tracing_options.default_filter = "info".to_string();
        }
    }
    init_tracing(&tracing_options)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host, .. } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} SmartBiz API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {}",
                console::style(format!("Data directory: {}", state.data_dir.display())).dim()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Business { action } => match action {
            BusinessCommand::Create {
                name,
                industry,
                description,
                audience,
                tone,
            } => {
                let patch = BusinessPatch {
                    name: Some(name),
                    industry,
                    description,
                    target_audience: audience,
                    brand_tone: tone,
                    ..Default::default()
                };
                cli::business::create_business(&state, patch, cli.json).await?;
            }
            BusinessCommand::Show { id } => {
                cli::business::show_business(&state, &id, cli.json).await?;
            }
        },

        Commands::Agent { action } => match action {
            AgentCommand::Create { name, business } => {
                cli::agent::create_agent(&state, &name, business.as_deref(), cli.json).await?;
            }
            AgentCommand::Show { id } => {
                cli::agent::show_agent(&state, &id, cli.json).await?;
            }
            AgentCommand::List { business } => {
                cli::agent::list_agents(&state, &business, cli.json).await?;
            }
            AgentCommand::Delete { id } => {
                cli::agent::delete_agent(&state, &id, cli.json).await?;
            }
        },

        Commands::Chat {
            agent,
            message,
            image,
            context,
        } => {
            cli::chat::chat(&state, &agent, message, image.as_deref(), context, cli.json).await?;
        }

        Commands::History { agent } => {
            cli::history::history(&state, &agent, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
