// Signal handling module
//
// Supported signals:
// - SIGTERM: stop the server
// - SIGINT:  stop the server (Ctrl+C)

use super::ServerHandle;
use crate::logger;

/// Start the signal listener (Unix)
///
/// Spawns a background task that stops the server on the first
/// SIGTERM or SIGINT.
#[cfg(unix)]
pub fn start_signal_handler(handle: ServerHandle) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    logger::log_error(&format!("Failed to register signal handlers: {e}"));
                    return;
                }
            };

        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };

        logger::log_info(&format!("{name} received, stopping server"));
        handle.stop();
    });
}

/// Fallback for other platforms - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handle: ServerHandle) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                logger::log_info("Ctrl+C received, stopping server");
                handle.stop();
            }
            Err(e) => logger::log_error(&format!("Failed to listen for Ctrl+C: {e}")),
        }
    });
}
