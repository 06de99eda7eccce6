use super::error::CatalogError;
use super::protocol::{ErrorResponse, HealthResponse, ImportResponse, RejectedProduct};
use super::source::SharedCatalog;
use super::types::Product;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};

pub type ErrorReply = (StatusCode, Json<ErrorResponse>);

/// Logs a catalog failure and converts it into the JSON error body.
pub fn error_reply(err: CatalogError) -> ErrorReply {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("Catalog operation failed: {}", err);
    } else {
        tracing::debug!("Catalog request rejected: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn not_found(slug: &str) -> ErrorReply {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("product not found: {}", slug),
        }),
    )
}

/// `201 Created` for a new slug, `200 OK` when an existing product was replaced.
pub async fn handle_put_product(
    Extension(catalog): Extension<SharedCatalog>,
    Json(product): Json<Product>,
) -> Result<(StatusCode, Json<Product>), ErrorReply> {
    let stored = catalog.upsert(product).await.map_err(error_reply)?;
    let status = if stored.created {
        tracing::info!("Created product {}", stored.product.slug);
        StatusCode::CREATED
    } else {
        tracing::info!("Updated product {}", stored.product.slug);
        StatusCode::OK
    };
    Ok((status, Json(stored.product)))
}

pub async fn handle_get_product(
    Extension(catalog): Extension<SharedCatalog>,
    Path(slug): Path<String>,
) -> Result<Json<Product>, ErrorReply> {
    match catalog.get(&slug).await.map_err(error_reply)? {
        Some(product) => Ok(Json(product)),
        None => Err(not_found(&slug)),
    }
}

pub async fn handle_delete_product(
    Extension(catalog): Extension<SharedCatalog>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ErrorReply> {
    if catalog.remove(&slug).await.map_err(error_reply)? {
        tracing::info!("Deleted product {}", slug);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&slug))
    }
}

/// Upserts each product in order. Invalid records are reported and skipped;
/// any other failure aborts the import.
pub async fn handle_import_products(
    Extension(catalog): Extension<SharedCatalog>,
    Json(products): Json<Vec<Product>>,
) -> Result<Json<ImportResponse>, ErrorReply> {
    let mut imported = 0;
    let mut rejected = Vec::new();

    for product in products {
        let slug = product.slug.clone();
        match catalog.upsert(product).await {
            Ok(_) => imported += 1,
            Err(CatalogError::Invalid(reason)) => {
                tracing::warn!("Rejected product '{}': {}", slug, reason);
                rejected.push(RejectedProduct { slug, reason });
            }
            Err(e) => return Err(error_reply(e)),
        }
    }

    tracing::info!(
        "Imported {} products ({} rejected)",
        imported,
        rejected.len()
    );
    Ok(Json(ImportResponse { imported, rejected }))
}

pub async fn handle_health(
    Extension(catalog): Extension<SharedCatalog>,
) -> Result<Json<HealthResponse>, ErrorReply> {
    let products = catalog.count().await.map_err(error_reply)?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        products,
    }))
}
