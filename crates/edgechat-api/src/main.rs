//! edgechat CLI and REST API entry point.
//!
//! Binary name: `edgechat`
//!
//! Parses CLI arguments, loads configuration, opens the message store,
//! then dispatches to a command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use edgechat_infra::config::{load_config, resolve_data_dir};
use edgechat_observe::tracing_setup::{ObserveConfig, init_tracing, shutdown_tracing};

use cli::{Cli, Commands, DeleteResource};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut observe = ObserveConfig::from_verbosity(cli.verbose);
    if cli.quiet && cli.verbose == 0 {
        observe.default_filter = "error".to_string();
    }
    observe.json = cli.log_json;
    observe.otel = cli.otel;
    init_tracing(&observe).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "edgechat", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let mut config = load_config(&data_dir).await;
    if let Some(model) = cli.model {
        config.backend.model = model;
    }
    if let Some(url) = cli.ollama_url {
        config.backend.base_url = url;
    }

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            let state = AppState::init(data_dir, config).await?;
            serve(state).await?;
        }

        Commands::Send { message, session } => {
            let state = AppState::init(data_dir, config).await?;
            cli::chat::send(&state, &message, session, cli.json).await?;
        }

        Commands::History {
            session,
            raw,
            limit,
        } => {
            let state = AppState::init(data_dir, config).await?;
            cli::chat::history(&state, &session, raw, limit, cli.json).await?;
        }

        Commands::Sessions => {
            let state = AppState::init(data_dir, config).await?;
            cli::session::list_sessions(&state, cli.json).await?;
        }

        Commands::NewSession => {
            let state = AppState::init(data_dir, config).await?;
            cli::session::new_session(&state, cli.json);
        }

        Commands::Delete { resource } => {
            let state = AppState::init(data_dir, config).await?;
            match resource {
                DeleteResource::Session { id, force } => {
                    cli::session::delete_session(&state, &id, force, cli.json).await?;
                }
                DeleteResource::All { force } => {
                    cli::session::delete_all(&state, force, cli.json).await?;
                }
            }
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Run the REST API until Ctrl+C or SIGTERM.
async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} edgechat API listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!(
        "  {}",
        console::style(format!(
            "Backend: {} ({})",
            state.config.backend.base_url, state.config.backend.model
        ))
        .dim()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
