//! Search Service Module
//!
//! Product-name search for the storefront.
//!
//! ## Overview
//! A query is answered by fetching the working set from the catalog, then ranking it
//! in memory with a five-tier fallback: exact name, exact word, all words (scored),
//! any word (scored) and fuzzy prefixes (scored). Only the first tier that matches
//! anything contributes to the response.
//!
//! ## Submodules
//! - **`normalize`**: Vietnamese-aware lowercasing, diacritic stripping and cleanup.
//! - **`engine`**: The layered ranking itself. Pure and synchronous.
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`types`**: Candidate projection, layer markers and query parameters.

pub mod engine;
pub mod handlers;
pub mod normalize;
pub mod types;
