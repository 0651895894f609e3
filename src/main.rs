use std::sync::Arc;

use tracing::{error, info};

use newsdesk::{Config, FeedAggregator, ReqwestClient, WebServer};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = newsdesk::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        newsdesk::logging::init_console_only(&config.logging.level);
    }

    info!("newsdesk {}", env!("CARGO_PKG_VERSION"));
    info!("{} feed sources configured", config.feeds.sources.len());

    let client = match ReqwestClient::new(&config.feeds) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let aggregator = match FeedAggregator::from_config(&config, client) {
        Ok(aggregator) => Arc::new(aggregator),
        Err(e) => {
            error!("Failed to build feed aggregator: {}", e);
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config.server, aggregator) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Server configured on {}", server.addr());

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
