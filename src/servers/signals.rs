//! This module contains functions to handle signals.
use std::time::Duration;

use derive_more::Display;
use tracing::info;

/// This is the message that the "launcher" spawned task receives from the
/// main application process to notify the service to shutdown.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Halted {
    Normal,
    Dropped,
}

/// Resolves on `ctrl_c` or the `terminate` signal.
///
/// # Panics
///
/// Will panic if unable to install a signal handler.
pub async fn global_shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        _ = terminate => {}
    }
}

/// Resolves when the `rx_halt` channel or the `global_shutdown_signal()`
/// resolves.
///
/// # Panics
///
/// Will panic if unable to connect to the receiving channel.
pub async fn shutdown_signal(rx_halt: tokio::sync::oneshot::Receiver<Halted>) {
    let halt = async {
        match rx_halt.await {
            Ok(signal) => signal,
            Err(err) => panic!("Failed to install stop signal: {err}"),
        }
    };

    tokio::select! {
        signal = halt => { info!("Halt signal processed: {}", signal) },
        () = global_shutdown_signal() => { info!("Global shutdown signal processed") }
    }
}

/// Awaits the shutdown signal and then tells the `axum_server` handle to stop
/// accepting connections and drain the live ones.
pub async fn graceful_shutdown(handle: axum_server::Handle, rx_halt: tokio::sync::oneshot::Receiver<Halted>, message: String) {
    shutdown_signal(rx_halt).await;

    info!("{message}");

    handle.graceful_shutdown(Some(Duration::from_secs(90)));

    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;

        info!("Pending connections: {}", handle.connection_count());
    }
}
