use scaffold_httpd::config::Config;
use scaffold_httpd::logger;
use scaffold_httpd::server::{signal, Server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // First argument: config file path without extension (default: config.toml)
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let server = Server::bind(&cfg)?;
    let addr = server.local_addr()?;
    logger::log_server_start(&addr, &cfg);

    signal::start_signal_handler(server.handle());
    server.run().await?;
    Ok(())
}
