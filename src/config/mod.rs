// Configuration module entry point
// Loads server configuration from an optional file, the environment, and defaults

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

pub use state::AppState;
pub use types::{AssetConfig, Config, LoggingConfig, PerformanceConfig, ServerConfig};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4850;
pub const DEFAULT_ASSET_PATH: &str = "./index.html";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            // SERVER_ASSET__PATH=./page.html overrides asset.path
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Configuration made of defaults only, ignoring files and environment
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", DEFAULT_PORT)?
            .set_default("asset.path", DEFAULT_ASSET_PATH)?
            .set_default("asset.cache", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.backlog", 128)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        // Parsed as a bare IP so IPv6 hosts ("::1") need no brackets
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| format!("Invalid address '{}': {e}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 4850);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.asset.path, "./index.html");
        assert!(!cfg.asset.cache);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.performance.backlog, 128);
        assert_eq!(cfg.performance.max_connections, None);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::defaults().unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:4850");
    }

    #[test]
    fn test_ipv6_socket_addr() {
        let mut cfg = Config::defaults().unwrap();
        cfg.server.host = "::1".to_string();
        cfg.server.port = 8080;
        let addr = cfg.socket_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.to_string(), "[::1]:8080");
    }

    #[test]
    fn test_invalid_socket_addr() {
        let mut cfg = Config::defaults().unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9000\n\n[asset]\npath = \"/srv/page.html\"\ncache = true\n",
        )
        .unwrap();

        let stem = dir.path().join("server");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.asset.path, "/srv/page.html");
        assert!(cfg.asset.cache);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("absent");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.asset.path, DEFAULT_ASSET_PATH);
    }
}
