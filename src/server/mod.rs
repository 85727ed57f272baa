// Server module entry
// Binds the listener and runs the accept loop with an explicit start/stop lifecycle

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), use server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::config::{AppState, Config};

pub use listener::create_listener;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Address(String),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Cloneable handle that stops a running [`Server`]
#[derive(Debug, Clone, Default)]
pub struct ServerHandle {
    shutdown: Arc<Notify>,
    stopped: Arc<AtomicBool>,
}

impl ServerHandle {
    /// Request shutdown. Honored even if the server has not started running yet.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.shutdown.notify_one();
        }
    }
}

/// A bound HTTP server
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    handle: ServerHandle,
}

impl Server {
    /// Bind the configured address with the default method policies.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        Self::with_state(Arc::new(AppState::new(config)))
    }

    /// Bind the address configured in `state`
    pub fn with_state(state: Arc<AppState>) -> Result<Self, ServerError> {
        let addr = state.config.socket_addr().map_err(ServerError::Address)?;
        let listener = create_listener(addr, state.config.performance.backlog)
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state,
            handle: ServerHandle::default(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn handle(&self) -> ServerHandle {
        self.handle.clone()
    }

    /// Serve connections until [`ServerHandle::stop`] is called.
    ///
    /// Connections are driven on a `LocalSet` owned by this call, so the
    /// accept loop and every connection run on the calling thread.
    pub async fn run(self) -> Result<(), ServerError> {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(server_loop::run_accept_loop(
                self.listener,
                self.state,
                self.handle,
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let mut config = Config::defaults().unwrap();
        config.server.port = 0;
        config.logging.access_log = false;
        config
    }

    #[tokio::test]
    async fn test_bind_reports_local_addr() {
        let server = Server::bind(&test_config()).unwrap();
        let addr = server.local_addr().unwrap();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_invalid_host_is_address_error() {
        let mut config = test_config();
        config.server.host = "no such host".to_string();
        assert!(matches!(
            Server::bind(&config),
            Err(ServerError::Address(_))
        ));
    }

    #[tokio::test]
    async fn test_port_in_use_is_bind_error() {
        let first = Server::bind(&test_config()).unwrap();
        let mut config = test_config();
        config.server.port = first.local_addr().unwrap().port();
        assert!(matches!(
            Server::bind(&config),
            Err(ServerError::Bind { .. })
        ));
    }

    #[tokio::test]
    async fn test_stop_before_run_returns() {
        let server = Server::bind(&test_config()).unwrap();
        let handle = server.handle();
        handle.stop();
        handle.stop();

        tokio::time::timeout(std::time::Duration::from_secs(5), server.run())
            .await
            .expect("server did not stop")
            .unwrap();
    }
}
