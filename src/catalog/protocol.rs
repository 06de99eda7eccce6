//! Catalog HTTP Protocol
//!
//! Route paths served by this node and the DTOs exchanged on them. The same
//! product paths are used when talking to an upstream catalog API.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Product collection: `POST` upserts, `GET` (upstream only) lists.
pub const ENDPOINT_PRODUCTS: &str = "/products";
/// Single product by slug.
pub const ENDPOINT_PRODUCT: &str = "/products/:slug";
/// Bulk upsert of a JSON array of products.
pub const ENDPOINT_IMPORT: &str = "/products/import";
/// Search over every product.
pub const ENDPOINT_SEARCH: &str = "/products/search";
/// Search over products whose visibility flag is `false`.
pub const ENDPOINT_SEARCH_VISIBLE: &str = "/products/search/visible";
/// Liveness and catalog size.
pub const ENDPOINT_HEALTH: &str = "/health";

// --- Data Transfer Objects ---

/// Body returned with every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Outcome of a bulk import.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Records stored.
    pub imported: usize,
    /// Records rejected, with the reason for each.
    pub rejected: Vec<RejectedProduct>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RejectedProduct {
    pub slug: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub products: usize,
}
