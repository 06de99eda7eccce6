use anyhow::Context;
use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use clap::Parser;
use std::sync::Arc;
use storefront_search::catalog::handlers::{
    handle_delete_product, handle_get_product, handle_health, handle_import_products,
    handle_put_product,
};
use storefront_search::catalog::memory::MemoryCatalog;
use storefront_search::catalog::protocol::*;
use storefront_search::catalog::remote::RemoteCatalog;
use storefront_search::catalog::source::SharedCatalog;
use storefront_search::config::Config;
use storefront_search::search::handlers::{handle_search, handle_search_visible};
use storefront_search::search::types::SearchSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // 1. Catalog backend:
    let catalog: SharedCatalog = match &config.catalog_url {
        Some(url) => {
            tracing::info!("Using upstream catalog at {}", url);
            if config.seed_file.is_some() {
                tracing::warn!("Seed file ignored when an upstream catalog is configured");
            }
            Arc::new(
                RemoteCatalog::new(url, config.fetch_timeout(), config.fetch_attempts)
                    .with_context(|| format!("invalid catalog url {}", url))?,
            )
        }
        None => {
            let memory = MemoryCatalog::new();
            if let Some(path) = &config.seed_file {
                memory
                    .load_json(path)
                    .await
                    .with_context(|| format!("failed to load seed file {}", path.display()))?;
            }
            tracing::info!(
                "Using in-memory catalog ({} products)",
                memory.local_entry_count()
            );
            Arc::new(memory)
        }
    };

    let settings = SearchSettings {
        default_limit: config.default_limit.max(1),
    };

    // 2. HTTP Router:
    let app = Router::new()
        .route(ENDPOINT_SEARCH, get(handle_search))
        .route(ENDPOINT_SEARCH_VISIBLE, get(handle_search_visible))
        .route(ENDPOINT_PRODUCTS, post(handle_put_product))
        .route(ENDPOINT_IMPORT, post(handle_import_products))
        .route(
            ENDPOINT_PRODUCT,
            get(handle_get_product).delete(handle_delete_product),
        )
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(catalog))
        .layer(Extension(settings));

    // 3. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
