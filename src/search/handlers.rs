use super::engine::search;
use super::types::{Candidate, SearchParams, SearchSettings};
use crate::catalog::handlers::{ErrorReply, error_reply};
use crate::catalog::source::SharedCatalog;
use crate::catalog::types::CatalogFilter;
use crate::pagination::{PageRequest, Paginated};

use axum::extract::Query;
use axum::{Extension, Json};
use std::time::Instant;

/// Longest query, in characters, handed to the ranker. Anything past it is
/// dropped before normalization.
pub const MAX_QUERY_CHARS: usize = 200;

/// `GET /products/search` over the whole catalog.
pub async fn handle_search(
    Query(params): Query<SearchParams>,
    Extension(catalog): Extension<SharedCatalog>,
    Extension(settings): Extension<SearchSettings>,
) -> Result<Json<Paginated<Candidate>>, ErrorReply> {
    run_search(params, &catalog, settings, CatalogFilter::All).await
}

/// `GET /products/search/visible`.
///
/// Searches products whose `is_visible` flag is `false`; existing clients
/// depend on this route selecting that set.
pub async fn handle_search_visible(
    Query(params): Query<SearchParams>,
    Extension(catalog): Extension<SharedCatalog>,
    Extension(settings): Extension<SearchSettings>,
) -> Result<Json<Paginated<Candidate>>, ErrorReply> {
    run_search(params, &catalog, settings, CatalogFilter::NotVisible).await
}

async fn run_search(
    params: SearchParams,
    catalog: &SharedCatalog,
    settings: SearchSettings,
    filter: CatalogFilter,
) -> Result<Json<Paginated<Candidate>>, ErrorReply> {
    let page = PageRequest::resolve(params.page, params.limit, settings.default_limit);
    let candidates = catalog
        .fetch_candidates(filter)
        .await
        .map_err(error_reply)?;

    let term = truncate_query(&params.q);
    let started = Instant::now();
    let outcome = search(&candidates, term, page.skip(), page.limit);
    tracing::debug!(
        "Search '{}' over {} candidates ({:?}): layer={:?} total={} in {:?}",
        term,
        candidates.len(),
        filter,
        outcome.layer,
        outcome.total,
        started.elapsed()
    );

    Ok(Json(Paginated::new(outcome.data, outcome.total, page)))
}

pub(crate) fn truncate_query(q: &str) -> &str {
    match q.char_indices().nth(MAX_QUERY_CHARS) {
        Some((end, _)) => &q[..end],
        None => q,
    }
}
