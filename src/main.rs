use jornada_engine::api::{AppState, create_router};
use jornada_engine::config::{ConfigLoader, ServerSettings};
use jornada_engine::store::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ServerSettings::from_env()?;

    tracing::info!(config_dir = %settings.config_dir.display(), "Loading catalog");
    let config = ConfigLoader::load(&settings.config_dir)
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?
        .into_config();

    let store = match &settings.data_file {
        Some(path) => {
            tracing::info!(data_file = %path.display(), "Opening data snapshot");
            Store::open(config, path).await?
        }
        None => {
            tracing::warn!("JORNADA_DATA_FILE not set, data will not survive a restart");
            Store::in_memory(config)
        }
    };

    let app = create_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "Jornada engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}
