use crate::search::types::Candidate;
use serde::{Deserialize, Serialize};

/// A catalog product record. `slug` is the store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub is_visible: bool,
}

/// Outcome of storing a product: the record as stored, and whether its slug
/// was new to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Upsert {
    pub product: Product,
    pub created: bool,
}

impl From<&Product> for Candidate {
    fn from(product: &Product) -> Self {
        Candidate {
            name: product.name.clone(),
            slug: product.slug.clone(),
            current_price: product.current_price,
            discount_price: product.discount_price,
            thumbnail: product.thumbnail.clone(),
            is_visible: product.is_visible,
        }
    }
}

/// Selects the working set handed to the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFilter {
    /// Every product, regardless of visibility.
    All,
    /// Only products whose `is_visible` flag is `false`.
    NotVisible,
}

impl CatalogFilter {
    pub fn accepts(&self, product: &Product) -> bool {
        match self {
            CatalogFilter::All => true,
            CatalogFilter::NotVisible => !product.is_visible,
        }
    }

    /// Query-string form understood by the upstream product API.
    pub fn as_query(&self) -> Option<(&'static str, &'static str)> {
        match self {
            CatalogFilter::All => None,
            CatalogFilter::NotVisible => Some(("visible", "false")),
        }
    }
}
