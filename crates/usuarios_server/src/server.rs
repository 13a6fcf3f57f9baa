//! Process bootstrap: logging, store, listener, shutdown.

use std::path::PathBuf;

use log::{error, info};
use thiserror::Error;
use tokio::net::TcpListener;
use usuarios_core::{
    core_version, init_logging, open_db, DbError, LoggingError, SqliteUsuarioRepository,
};

use crate::config::ServerConfig;
use crate::handlers::AppState;
use crate::routes::build_router;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),
    #[error("failed to open database `{}`: {source}", .path.display())]
    Database { path: PathBuf, source: DbError },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Runs the service until a shutdown signal arrives.
///
/// The store is opened and migrated before the listener is bound; if that
/// fails no connection is ever accepted.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    init_logging(config.log_level(), config.log_dir.as_deref())?;

    let conn = open_db(&config.database).map_err(|source| {
        error!(
            "event=server_start module=server status=error stage=db path={} error={}",
            config.database.display(),
            source
        );
        ServerError::Database {
            path: config.database.clone(),
            source,
        }
    })?;
    let state = AppState::new(SqliteUsuarioRepository::new(conn));
    let router = build_router(state);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr.as_str())
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(
        "event=server_start module=server status=ok addr={} database={} version={}",
        addr,
        config.database.display(),
        core_version()
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("event=shutdown_signal module=server status=error error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("event=shutdown_signal module=server status=error error={err}");
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

    info!("event=shutdown_signal module=server status=ok");
}
