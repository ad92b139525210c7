//! Graceful shutdown

use tokio::signal;

/// Handler for graceful shutdown
///
/// Will listen to Ctrl+C and SIGTERM to initiate a shutdown
pub async fn handler() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Could not listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                tracing::error!("Could not listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "Ctrl+C",
        () = terminate => "SIGTERM",
    };

    tracing::info!("{signal} received, starting graceful shutdown");
}
