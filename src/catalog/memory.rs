use super::error::CatalogError;
use super::source::{CatalogSource, validate};
use super::types::{CatalogFilter, Product, Upsert};
use crate::search::types::Candidate;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Product store held entirely in process memory.
///
/// Entries carry the sequence number of their first insertion so fetches return
/// products in a stable catalog order.
pub struct MemoryCatalog {
    products: DashMap<String, (u64, Product)>,
    next_seq: AtomicU64,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        for product in products {
            catalog.store_local(product)?;
        }
        Ok(catalog)
    }

    /// Bulk-loads a JSON array of products from `path`.
    ///
    /// Returns the number of records stored.
    pub async fn load_json(&self, path: impl AsRef<Path>) -> Result<usize, CatalogError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        let count = products.len();

        for product in products {
            self.store_local(product)?;
        }

        tracing::info!(
            "Loaded {} products from {}",
            count,
            path.as_ref().display()
        );
        Ok(count)
    }

    pub fn store_local(&self, mut product: Product) -> Result<Upsert, CatalogError> {
        validate(&product)?;

        let created = match self.products.entry(product.slug.clone()) {
            Entry::Occupied(mut occupied) => {
                let (_, existing) = occupied.get_mut();
                // Updates without an id keep the one already assigned to the slug.
                if product.id.is_empty() {
                    product.id = existing.id.clone();
                }
                *existing = product.clone();
                false
            }
            Entry::Vacant(vacant) => {
                if product.id.is_empty() {
                    product.id = Uuid::new_v4().to_string();
                }
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert((seq, product.clone()));
                true
            }
        };

        Ok(Upsert { product, created })
    }

    pub fn get_local(&self, slug: &str) -> Option<Product> {
        self.products.get(slug).map(|entry| entry.1.clone())
    }

    /// Snapshot of the products accepted by `filter`, in catalog order.
    pub fn snapshot(&self, filter: CatalogFilter) -> Vec<Product> {
        let mut entries: Vec<(u64, Product)> = self
            .products
            .iter()
            .filter(|entry| filter.accepts(&entry.value().1))
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, product)| product).collect()
    }

    pub fn local_entry_count(&self) -> usize {
        self.products.len()
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    async fn fetch_candidates(&self, filter: CatalogFilter) -> Result<Vec<Candidate>, CatalogError> {
        Ok(self
            .snapshot(filter)
            .iter()
            .map(Candidate::from)
            .collect())
    }

    async fn upsert(&self, product: Product) -> Result<Upsert, CatalogError> {
        let stored = self.store_local(product)?;
        tracing::debug!(
            "Stored product {} (created={})",
            stored.product.slug,
            stored.created
        );
        Ok(stored)
    }

    async fn get(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.get_local(slug))
    }

    async fn remove(&self, slug: &str) -> Result<bool, CatalogError> {
        Ok(self.products.remove(slug).is_some())
    }

    async fn count(&self) -> Result<usize, CatalogError> {
        Ok(self.local_entry_count())
    }
}
