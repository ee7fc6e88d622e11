//! Workout tracker HTTP server.
//!
//! Reads configuration from the environment, opens the SQLite store, and
//! serves the workout resource under `/api/workouts` until shutdown.

mod app;
mod config;
mod error;

use std::{process::ExitCode, sync::Arc};

use log::{error, info, warn};
use tokio::{net::TcpListener, signal};
use workout_core::{
    core_version, init_logging, SqliteWorkoutStore, WorkoutController, WorkoutResource,
};

use config::{Config, DbLocation};
use error::ServerError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("workout_server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = Config::from_env()?;
    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(ServerError::Logging)?;
    info!(
        "event=server_start module=server status=start version={}",
        core_version()
    );

    // The listener is bound only after the store is ready.
    let store = match &config.db {
        DbLocation::File(path) => SqliteWorkoutStore::open(path)?,
        DbLocation::Memory => SqliteWorkoutStore::open_in_memory()?,
    };
    let controller = Arc::new(WorkoutController::new(WorkoutResource::new(store)));
    let app = app::router(controller);

    let address = config.address();
    let listener = TcpListener::bind(&address).await?;
    info!("event=server_listen module=server status=ok address={address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown_signal module=server signal=ctrl_c"),
            Err(err) => {
                warn!("event=shutdown_signal module=server status=error signal=ctrl_c error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=server signal=terminate");
            }
            Err(err) => {
                warn!("event=shutdown_signal module=server status=error signal=terminate error={err}");
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
