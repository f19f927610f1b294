use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use streamflix_core::config::Config;
use streamflix_core::services::StaticSession;
use streamflix_core::state::AppState;
use streamflix_core::store::RestContentStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("streamflix_core=info")),
        )
        .init();

    info!("Starting StreamFlix");

    let config = Config::load()?;
    let store = Arc::new(RestContentStore::new(
        &config.store.base_url,
        &config.store.project_id,
        config.store.api_key.clone(),
        config.request_timeout(),
    )?);
    let session = Arc::new(StaticSession::new());

    let state = AppState::new(store, session, config);
    state.initialize().await?;

    let home = state.content_service.load_home().await?;
    info!(
        "Catalog reachable: {} movies, {} tv shows{}",
        home.movies.len(),
        home.tv_shows.len(),
        home.featured
            .map(|f| format!(", featured '{}'", f.title))
            .unwrap_or_default()
    );

    Ok(())
}
