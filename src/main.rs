use tracing::{error, info};

use estate::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = estate::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        estate::logging::init_console_only(&config.logging.level);
    }

    info!("Estate - real-estate listing API");

    if let Err(e) = run(config).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> estate::Result<()> {
    config.validate()?;

    let db = Database::open(&config.database.path).await?;
    info!("Database ready (schema version {})", db.schema_version().await?);

    let server = WebServer::new(&config, db)?;
    info!("Server configured on {}", server.addr());
    server.run().await
}
