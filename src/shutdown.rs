//! Process shutdown signals.

/// Completes on SIGINT or SIGTERM (Ctrl+C on Windows).
///
/// If the signal handlers cannot be installed the future never completes,
/// leaving shutdown to end of input or process termination.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (Ok(mut sigint), Ok(mut sigterm)) = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) else {
        tracing::warn!("Failed to install signal handlers");
        return std::future::pending().await;
    };

    tokio::select! {
        _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown"),
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

/// Completes on SIGINT or SIGTERM (Ctrl+C on Windows).
///
/// If the signal handler cannot be installed the future never completes,
/// leaving shutdown to end of input or process termination.
#[cfg(windows)]
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Failed to install Ctrl+C handler");
        return std::future::pending().await;
    }
    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
}
