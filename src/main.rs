use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use netlink::mail::SmtpMailer;
use netlink::media::LocalImageStore;
use netlink::web::{AppState, WebServer};
use netlink::{Config, Database};

#[tokio::main]
async fn main() -> ExitCode {
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
    if let Err(e) = netlink::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        netlink::logging::init_console_only(&config.logging.level);
    }

    info!("NetLink - professional social network backend");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> netlink::Result<()> {
    config.validate()?;

    let db = Database::open(&config.database.path).await?;
    info!(
        "Database ready at {} (schema v{})",
        config.database.path,
        db.schema_version().await?
    );

    let images = LocalImageStore::new(
        &config.images.storage_path,
        &config.images.public_base_url,
        config.images.max_size_mb,
    )?;
    let images_dir = images.base_path().to_path_buf();

    let mailer = SmtpMailer::new(&config.mail)?;
    if !config.server.production {
        warn!("Running in development mode; session cookies are not marked Secure");
    }

    let state = AppState::new(&config, db, Arc::new(images), Arc::new(mailer))?;
    let server = WebServer::new(&config, state, images_dir)?;
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );
    server.run().await
}
