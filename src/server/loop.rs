// Server loop module
// Accepts connections one at a time until the server is stopped

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::{ServerError, ServerHandle};
use crate::config::AppState;
use crate::logger;

/// Accept loop. Must run inside a `LocalSet`, connections are spawned on it.
///
/// Returns once `handle.stop()` has been called; the listener is closed on return.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    handle: ServerHandle,
) -> Result<(), ServerError> {
    let local_addr = listener.local_addr()?;

    loop {
        tokio::select! {
            biased;

            () = handle.shutdown.notified() => break,

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
        }
    }

    drop(listener);
    logger::log_server_stopped(&local_addr);
    Ok(())
}
