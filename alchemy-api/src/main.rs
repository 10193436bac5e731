//! team-alchemy - Team Alchemy service entry point

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Duration;

use alchemy_api::cli::{self, Cli, Command};
use alchemy_api::{build_router, AppState};
use alchemy_common::config::{LogFormat, Settings};
use alchemy_common::db::connect;
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// How long queued jobs get to finish after the server stops
const JOB_DRAIN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.overrides()).context("Failed to load configuration")?;

    init_tracing(&settings)?;

    match cli.command() {
        Command::Serve => serve(settings).await,
        command => {
            let output = cli::run(command, &settings).await?;
            println!("{}", output);
            Ok(())
        }
    }
}

fn init_tracing(settings: &Settings) -> Result<()> {
    let level = settings.tracing_level();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "alchemy_api={lvl},alchemy_common={lvl},alchemy_core={lvl},tower_http={lvl}",
            lvl = level
        )
        .into()
    });

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    match settings.log_format {
        LogFormat::Json => layers.push(fmt::layer().json().boxed()),
        LogFormat::Text => layers.push(fmt::layer().boxed()),
    }
    if let Some(path) = &settings.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).with(filter).init();
    Ok(())
}

async fn serve(settings: Settings) -> Result<()> {
    info!("Starting {}", cli::version_line(&settings.app_name));
    info!(
        environment = %settings.environment,
        auth = settings.require_auth,
        "Configuration loaded"
    );
    if settings.debug {
        warn!("Debug mode is on");
    }

    let pool = match connect(&settings.database_url).await {
        Ok(pool) => {
            info!("✓ Connected to database {}", settings.database_url);
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let address = settings.bind_address();
    let prefix = settings.api_prefix.clone();
    let state = AppState::new(pool.clone(), settings);
    let jobs = state.jobs.clone();
    let shutdown_state = state.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("Listening on http://{}", address);
    info!("API: http://{}{}", address, prefix);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown_state.begin_shutdown();
        })
        .await
        .context("Server error")?;

    jobs.shutdown(JOB_DRAIN_GRACE).await;
    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
