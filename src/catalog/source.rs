use super::error::CatalogError;
use super::types::{CatalogFilter, Product, Upsert};
use crate::search::types::Candidate;
use async_trait::async_trait;
use std::sync::Arc;

/// Backing store for catalog products.
///
/// Handlers hold an `Arc<dyn CatalogSource>`; the search engine only ever sees
/// the `Vec<Candidate>` returned by [`CatalogSource::fetch_candidates`].
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Loads the full working set selected by `filter`, projected for search.
    async fn fetch_candidates(&self, filter: CatalogFilter) -> Result<Vec<Candidate>, CatalogError>;

    /// Inserts or replaces the product stored under `product.slug`.
    async fn upsert(&self, product: Product) -> Result<Upsert, CatalogError>;

    async fn get(&self, slug: &str) -> Result<Option<Product>, CatalogError>;

    /// Returns `true` if a product was removed.
    async fn remove(&self, slug: &str) -> Result<bool, CatalogError>;

    async fn count(&self) -> Result<usize, CatalogError>;
}

/// Rejects records that could never be matched or addressed.
pub fn validate(product: &Product) -> Result<(), CatalogError> {
    if product.name.trim().is_empty() {
        return Err(CatalogError::Invalid("name must not be empty".to_string()));
    }
    if product.slug.trim().is_empty() {
        return Err(CatalogError::Invalid("slug must not be empty".to_string()));
    }
    Ok(())
}

/// Handle shared by every request handler.
pub type SharedCatalog = Arc<dyn CatalogSource>;
