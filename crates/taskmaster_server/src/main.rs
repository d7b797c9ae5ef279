//! TaskMaster server entry point.

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use taskmaster_core::db::open_pool;
use taskmaster_core::{init_console_logging, init_logging, CredentialHasher};
use taskmaster_server::{build_router, AppState, Config, Overrides};
use tokio::net::TcpListener;
use tokio::signal;

#[derive(Debug, Parser)]
#[command(name = "taskmaster_server", version, about = "TaskMaster GraphQL server")]
struct Args {
    /// Path to a TOML config file.
    #[arg(long, env = "TASKMASTER_CONFIG")]
    config: Option<PathBuf>,
    /// Listen address, e.g. 127.0.0.1:4000.
    #[arg(long, env = "TASKMASTER_BIND")]
    bind: Option<String>,
    /// SQLite database file.
    #[arg(long, env = "TASKMASTER_DB")]
    db: Option<PathBuf>,
    #[arg(long, env = "TASKMASTER_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_overrides(Overrides {
        bind: args.bind,
        db_path: args.db,
        log_level: args.log_level,
    });
    let addr = config.validate()?;

    let logging = match &config.logging.dir {
        Some(dir) => {
            let dir = dir
                .to_str()
                .context("logging.dir must be valid UTF-8")?;
            init_logging(config.log_level(), dir)
        }
        None => init_console_logging(config.log_level()),
    };
    logging.map_err(anyhow::Error::msg)?;

    let pool = open_pool(&config.database.path, config.database.pool_size)
        .with_context(|| format!("opening database `{}`", config.database.path.display()))?;
    let hasher = CredentialHasher::new(config.password)?;
    let app = build_router(&config, AppState::new(pool, hasher))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("event=server_start module=server status=ok addr={addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("event=signal_install module=server status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("event=signal_install module=server status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("event=server_shutdown module=server status=start signal=ctrl_c"),
        _ = terminate => info!("event=server_shutdown module=server status=start signal=sigterm"),
    }
}
