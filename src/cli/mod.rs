use std::future::Future;

use clap::{Parser, Subcommand};
use tokio::signal;

use crate::config::{AppConfig, Environment};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "map-notes-api")]
#[command(about = "Map notes backend - access guard and asset upload forwarding")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Address to bind (default 0.0.0.0)")]
    pub host: Option<String>,

    #[arg(long, global = true, help = "Port to listen on (overrides MAP_NOTES_PORT / PORT)")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Report which external services are configured, then exit")]
    CheckConfig,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, cli.host, cli.port).await,
        Commands::CheckConfig => check_config(&config),
    }
}

async fn serve(config: AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting Map Notes API in {:?} mode", config.environment);

    if !config.assets.is_configured() {
        tracing::warn!("Cloudinary credentials missing; uploads will fail with 500");
    }
    if config.auth.jwt_secret.is_empty() {
        tracing::warn!("SUPABASE_JWT_SECRET not set; every navigation is treated as anonymous");
    }

    let bind_addr = format!(
        "{}:{}",
        host.as_deref().unwrap_or("0.0.0.0"),
        port.unwrap_or(config.api.port)
    );

    let app = crate::app(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Map Notes API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Map Notes API stopped");
    Ok(())
}

fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    let status = |ok: bool| if ok { "configured" } else { "MISSING" };

    println!("environment:  {:?}", config.environment);
    println!("asset host:   {}", status(config.assets.is_configured()));
    println!("identity:     {}", status(!config.auth.jwt_secret.is_empty()));
    println!("login path:   {}", config.auth.login_path);
    println!("public paths: {}", config.auth.public_paths.join(", "));
    println!("pages dir:    {}", config.pages.dir.display());

    if config.environment == Environment::Production
        && (!config.assets.is_configured() || config.auth.jwt_secret.is_empty())
    {
        anyhow::bail!("production configuration is incomplete");
    }
    Ok(())
}

/// Resolve once `signal` fires; a listener that failed to install never resolves
async fn received<F>(name: &str, signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("Received {}, starting graceful shutdown...", name),
        Err(e) => {
            tracing::error!("Failed to listen for {}: {}", name, e);
            std::future::pending::<()>().await;
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = received("SIGINT", signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
