//! Product Catalog Module
//!
//! The swappable collaborator that owns product records and hands the search
//! engine its working set.
//!
//! ## Core Concepts
//! - **Source**: `CatalogSource` is the seam the HTTP layer depends on. The search
//!   engine never reaches into a store directly; it receives the fetched candidates.
//! - **Filtering**: `CatalogFilter` selects the working set (all products, or only
//!   products with `is_visible == false`) before ranking.
//! - **Backends**: `MemoryCatalog` keeps products in a concurrent map keyed by slug;
//!   `RemoteCatalog` reads them from an upstream document-store API with bounded retry.
//! - **Admin**: handlers for upserting, reading, deleting and bulk-importing products.

pub mod error;
pub mod handlers;
pub mod memory;
pub mod protocol;
pub mod remote;
pub mod source;
pub mod types;

#[cfg(test)]
mod tests;
