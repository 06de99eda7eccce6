//! Storefront Product Search Library
//!
//! Core modules of the product search node. The binary (`main.rs`) wires them into
//! an Axum server.
//!
//! ## Modules
//! - **`catalog`**: Where products live. A `CatalogSource` trait with an in-memory
//!   backend and an upstream HTTP backend, plus admin handlers.
//! - **`config`**: Flag and environment configuration.
//! - **`pagination`**: The `{ data, total, page, totalPages }` envelope shared by listings.
//! - **`search`**: Text normalization and the layered product-name ranking.

pub mod catalog;
pub mod config;
pub mod pagination;
pub mod search;
