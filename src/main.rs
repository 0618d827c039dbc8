use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    // Worker thread count from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(&cfg.logging)?;

    // Route table is built before anything is accepted; bad config aborts here
    let state = match config::AppState::new(&cfg) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            logger::log_error(&format!("Invalid configuration: {e}"));
            return Err(e.into());
        }
    };

    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg);
    logger::log_route_table(&state.routes);

    server::run(listener, state).await?;
    Ok(())
}
