//! Catalog Module Tests
//!
//! Validates product storage, working-set filtering and the admin handlers.
//!
//! ## Test Scopes
//! - **MemoryCatalog**: Upsert semantics, id assignment, ordering, seed loading.
//! - **Filtering**: `CatalogFilter` selection and candidate projection.
//! - **Handlers**: Status codes for create/read/delete/import and error mapping.
//!
//! - **RemoteCatalog**: URL building, status mapping and decoding against a
//!   local axum upstream bound to `127.0.0.1:0`.

#[cfg(test)]
mod tests {
    use crate::catalog::error::CatalogError;
    use crate::catalog::handlers::{
        handle_delete_product, handle_get_product, handle_health, handle_import_products,
        handle_put_product,
    };
    use crate::catalog::memory::MemoryCatalog;
    use crate::catalog::remote::RemoteCatalog;
    use crate::catalog::source::{CatalogSource, SharedCatalog};
    use crate::catalog::types::{CatalogFilter, Product};
    use crate::search::types::Candidate;
    use axum::extract::Path;
    use axum::http::{Method, StatusCode, Uri};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Extension, Json, Router};
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn product(name: &str, slug: &str, is_visible: bool) -> Product {
        Product {
            id: String::new(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            current_price: Some(1_000.0),
            discount_price: Some(900.0),
            thumbnail: Some(format!("/img/{}.png", slug)),
            is_visible,
        }
    }

    // ============================================================
    // MEMORY CATALOG TESTS
    // ============================================================

    #[tokio::test]
    async fn test_upsert_assigns_id() {
        let catalog = MemoryCatalog::new();

        let stored = catalog
            .upsert(product("Ghế gỗ", "ghe-go", true))
            .await
            .unwrap();

        assert!(stored.created);
        assert!(!stored.product.id.is_empty());
        assert_eq!(catalog.get("ghe-go").await.unwrap(), Some(stored.product));
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_keeps_id() {
        let catalog = MemoryCatalog::new();
        let first = catalog
            .upsert(product("Ghế gỗ", "ghe-go", true))
            .await
            .unwrap();

        let updated = catalog
            .upsert(product("Ghế gỗ sồi", "ghe-go", false))
            .await
            .unwrap();

        assert!(first.created);
        assert!(!updated.created);
        assert_eq!(updated.product.id, first.product.id);
        assert_eq!(catalog.count().await.unwrap(), 1);
        let stored = catalog.get("ghe-go").await.unwrap().unwrap();
        assert_eq!(stored.name, "Ghế gỗ sồi");
        assert!(!stored.is_visible);
    }

    #[tokio::test]
    async fn test_upsert_keeps_explicit_id() {
        let catalog = MemoryCatalog::new();
        let mut record = product("Bàn gỗ", "ban-go", true);
        record.id = "p-001".to_string();

        let stored = catalog.upsert(record).await.unwrap();

        assert_eq!(stored.product.id, "p-001");
    }

    #[tokio::test]
    async fn test_upsert_rejects_blank_name_or_slug() {
        let catalog = MemoryCatalog::new();

        let blank_name = catalog.upsert(product("   ", "blank", true)).await;
        let blank_slug = catalog.upsert(product("Bàn", "", true)).await;

        assert!(matches!(blank_name, Err(CatalogError::Invalid(_))));
        assert!(matches!(blank_slug, Err(CatalogError::Invalid(_))));
        assert_eq!(catalog.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_keeps_insertion_order() {
        let catalog = MemoryCatalog::with_products(
            (0..50).map(|i| product(&format!("Sản phẩm {}", i), &format!("sp-{}", i), true)),
        )
        .unwrap();
        // Updating an existing slug must not move it
        catalog
            .upsert(product("Sản phẩm 0 mới", "sp-0", true))
            .await
            .unwrap();

        let candidates = catalog.fetch_candidates(CatalogFilter::All).await.unwrap();

        assert_eq!(candidates.len(), 50);
        assert_eq!(candidates[0].name, "Sản phẩm 0 mới");
        for (i, candidate) in candidates.iter().enumerate().skip(1) {
            assert_eq!(candidate.slug, format!("sp-{}", i));
        }
    }

    #[tokio::test]
    async fn test_fetch_not_visible_filter() {
        let catalog = MemoryCatalog::with_products([
            product("iPhone 15", "iphone-15", true),
            product("iPhone 14", "iphone-14", false),
            product("Nokia 3310", "nokia-3310", false),
        ])
        .unwrap();

        let hidden = catalog
            .fetch_candidates(CatalogFilter::NotVisible)
            .await
            .unwrap();
        let all = catalog.fetch_candidates(CatalogFilter::All).await.unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(hidden.len(), 2);
        assert!(hidden.iter().all(|c| !c.is_visible));
    }

    #[tokio::test]
    async fn test_remove() {
        let catalog = MemoryCatalog::with_products([product("Ghế", "ghe", true)]).unwrap();

        assert!(catalog.remove("ghe").await.unwrap());
        assert!(!catalog.remove("ghe").await.unwrap());
        assert_eq!(catalog.get("ghe").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_json_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "Tủ lạnh Samsung", "slug": "tu-lanh-samsung", "currentPrice": 12000000, "isVisible": true}},
                {{"name": "Máy giặt LG", "slug": "may-giat-lg"}}
            ]"#
        )
        .unwrap();

        let catalog = MemoryCatalog::new();
        let loaded = catalog.load_json(file.path()).await.unwrap();

        assert_eq!(loaded, 2);
        let fridge = catalog.get_local("tu-lanh-samsung").unwrap();
        assert_eq!(fridge.current_price, Some(12_000_000.0));
        assert!(fridge.is_visible);
        let washer = catalog.get_local("may-giat-lg").unwrap();
        assert!(!washer.is_visible);
        assert!(washer.thumbnail.is_none());
    }

    #[tokio::test]
    async fn test_load_json_reports_bad_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = MemoryCatalog::new().load_json(file.path()).await;

        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[tokio::test]
    async fn test_load_json_missing_file() {
        let result = MemoryCatalog::new()
            .load_json("/nonexistent/catalog.json")
            .await;

        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    // ============================================================
    // TYPES TESTS
    // ============================================================

    #[test]
    fn test_candidate_projection_copies_display_fields() {
        let mut record = product("Bàn gỗ", "ban-go", false);
        record.description = Some("Gỗ sồi tự nhiên".to_string());

        let candidate = Candidate::from(&record);

        assert_eq!(candidate.name, "Bàn gỗ");
        assert_eq!(candidate.slug, "ban-go");
        assert_eq!(candidate.current_price, Some(1_000.0));
        assert_eq!(candidate.discount_price, Some(900.0));
        assert_eq!(candidate.thumbnail.as_deref(), Some("/img/ban-go.png"));
        assert!(!candidate.is_visible);
    }

    #[test]
    fn test_filter_query_form() {
        assert_eq!(CatalogFilter::All.as_query(), None);
        assert_eq!(
            CatalogFilter::NotVisible.as_query(),
            Some(("visible", "false"))
        );
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            CatalogError::Unavailable("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            CatalogError::Upstream { status: 503 }.status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            CatalogError::Invalid("name".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::Io(std::io::Error::other("disk")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    // ============================================================
    // HANDLER TESTS
    // ============================================================

    fn shared(products: Vec<Product>) -> SharedCatalog {
        Arc::new(MemoryCatalog::with_products(products).unwrap())
    }

    #[tokio::test]
    async fn test_handle_put_then_get() {
        let catalog = shared(vec![]);

        let (status, Json(stored)) = handle_put_product(
            Extension(catalog.clone()),
            Json(product("Ghế gỗ", "ghe-go", true)),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = handle_get_product(Extension(catalog), Path("ghe-go".to_string()))
            .await
            .unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn test_handle_put_existing_slug_is_ok() {
        let catalog = shared(vec![product("Ghế gỗ", "ghe-go", true)]);
        let original = catalog.get("ghe-go").await.unwrap().unwrap();

        let (status, Json(stored)) = handle_put_product(
            Extension(catalog.clone()),
            Json(product("Ghế gỗ sồi", "ghe-go", true)),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.name, "Ghế gỗ sồi");
        assert_eq!(catalog.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_handle_put_invalid_is_bad_request() {
        let result = handle_put_product(
            Extension(shared(vec![])),
            Json(product("", "ghe-go", true)),
        )
        .await;

        let (status, Json(body)) = result.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("name"));
    }

    #[tokio::test]
    async fn test_handle_get_missing_is_not_found() {
        let result =
            handle_get_product(Extension(shared(vec![])), Path("missing".to_string())).await;

        let (status, _) = result.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_delete() {
        let catalog = shared(vec![product("Ghế", "ghe", true)]);

        let status = handle_delete_product(Extension(catalog.clone()), Path("ghe".to_string()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let again =
            handle_delete_product(Extension(catalog), Path("ghe".to_string())).await;
        assert_eq!(again.unwrap_err().0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_import_reports_rejections() {
        let catalog = shared(vec![]);

        let Json(report) = handle_import_products(
            Extension(catalog.clone()),
            Json(vec![
                product("Bàn gỗ", "ban-go", true),
                product("", "no-name", true),
                product("Ghế gỗ", "ghe-go", false),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].slug, "no-name");
        assert_eq!(catalog.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_handle_health_counts_products() {
        let catalog = shared(vec![product("Ghế", "ghe", true), product("Bàn", "ban", true)]);

        let Json(health) = handle_health(Extension(catalog)).await.unwrap();

        assert_eq!(health.status, "ok");
        assert_eq!(health.products, 2);
    }

    // ============================================================
    // REMOTE CATALOG TESTS
    // ============================================================

    #[test]
    fn test_remote_catalog_rejects_bad_url() {
        assert!(RemoteCatalog::new("not a url", Duration::from_millis(100), 1).is_err());
        assert!(RemoteCatalog::new("mailto:ops@example.com", Duration::from_millis(100), 1).is_err());
    }

    #[tokio::test]
    async fn test_remote_catalog_unreachable_is_unavailable() {
        // Port 9 (discard) is closed on test hosts
        let catalog =
            RemoteCatalog::new("http://127.0.0.1:9/api", Duration::from_millis(200), 2).unwrap();

        let result = catalog.fetch_candidates(CatalogFilter::All).await;

        let err = result.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_remote_catalog_validates_before_sending() {
        let catalog =
            RemoteCatalog::new("http://127.0.0.1:9/api", Duration::from_millis(200), 1).unwrap();

        let result = catalog.upsert(product("", "ghe", true)).await;

        assert!(matches!(result, Err(CatalogError::Invalid(_))));
    }

    // ============================================================
    // REMOTE CATALOG TESTS - local upstream
    // ============================================================

    type Recorded = Arc<Mutex<Vec<String>>>;

    fn record(recorded: &Recorded, method: &Method, uri: &Uri) {
        recorded.lock().unwrap().push(format!("{} {}", method, uri));
    }

    /// Ignores the `visible` query so the client-side filter is exercised.
    async fn upstream_list(
        Extension(recorded): Extension<Recorded>,
        method: Method,
        uri: Uri,
    ) -> Json<Vec<Product>> {
        record(&recorded, &method, &uri);
        Json(vec![
            product("iPhone 15", "iphone-15", true),
            product("iPhone 14", "iphone-14", false),
        ])
    }

    async fn upstream_get(
        Extension(recorded): Extension<Recorded>,
        method: Method,
        uri: Uri,
        Path(slug): Path<String>,
    ) -> Response {
        record(&recorded, &method, &uri);
        match slug.as_str() {
            "missing" => StatusCode::NOT_FOUND.into_response(),
            "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            "garbled" => "not json".into_response(),
            _ => Json(product("Ghế gỗ", &slug, true)).into_response(),
        }
    }

    async fn upstream_put(
        Extension(recorded): Extension<Recorded>,
        method: Method,
        uri: Uri,
        Path(slug): Path<String>,
        Json(mut incoming): Json<Product>,
    ) -> Response {
        record(&recorded, &method, &uri);
        if slug == "broken" {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        incoming.id = "remote-1".to_string();
        // "ghe-go" already exists upstream
        let status = if slug == "ghe-go" {
            StatusCode::OK
        } else {
            StatusCode::CREATED
        };
        (status, Json(incoming)).into_response()
    }

    async fn upstream_delete(
        Extension(recorded): Extension<Recorded>,
        method: Method,
        uri: Uri,
        Path(slug): Path<String>,
    ) -> StatusCode {
        record(&recorded, &method, &uri);
        match slug.as_str() {
            "missing" => StatusCode::NOT_FOUND,
            "broken" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::NO_CONTENT,
        }
    }

    /// Serves a product API under `/api` on an ephemeral port and returns its
    /// base URL with the request log.
    async fn spawn_upstream() -> (String, Recorded) {
        let recorded: Recorded = Arc::default();
        let app = Router::new()
            .route("/api/products", get(upstream_list))
            .route(
                "/api/products/:slug",
                get(upstream_get).put(upstream_put).delete(upstream_delete),
            )
            .layer(Extension(recorded.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/api", addr), recorded)
    }

    async fn remote() -> (RemoteCatalog, Recorded) {
        let (base_url, recorded) = spawn_upstream().await;
        let catalog = RemoteCatalog::new(&base_url, Duration::from_secs(5), 1).unwrap();
        (catalog, recorded)
    }

    fn requests(recorded: &Recorded) -> Vec<String> {
        recorded.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_remote_fetch_sends_filter_and_refilters_locally() {
        let (catalog, recorded) = remote().await;

        let hidden = catalog
            .fetch_candidates(CatalogFilter::NotVisible)
            .await
            .unwrap();

        assert_eq!(requests(&recorded), vec!["GET /api/products?visible=false"]);
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].slug, "iphone-14");
        assert!(!hidden[0].is_visible);
    }

    #[tokio::test]
    async fn test_remote_fetch_all_decodes_product_list() {
        let (catalog, recorded) = remote().await;

        let all = catalog.fetch_candidates(CatalogFilter::All).await.unwrap();

        assert_eq!(requests(&recorded), vec!["GET /api/products"]);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "iPhone 15");
        assert_eq!(all[0].current_price, Some(1_000.0));
        assert_eq!(all[1].thumbnail.as_deref(), Some("/img/iphone-14.png"));
        assert_eq!(catalog.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_remote_get() {
        let (catalog, recorded) = remote().await;

        let found = catalog.get("ghe-go").await.unwrap().unwrap();
        let missing = catalog.get("missing").await.unwrap();

        assert_eq!(found.slug, "ghe-go");
        assert_eq!(missing, None);
        assert_eq!(
            requests(&recorded),
            vec!["GET /api/products/ghe-go", "GET /api/products/missing"]
        );
    }

    #[tokio::test]
    async fn test_remote_remove() {
        let (catalog, recorded) = remote().await;

        assert!(catalog.remove("ghe-go").await.unwrap());
        assert!(!catalog.remove("missing").await.unwrap());
        assert_eq!(requests(&recorded)[0], "DELETE /api/products/ghe-go");
    }

    #[tokio::test]
    async fn test_remote_upsert_puts_to_encoded_slug() {
        let (catalog, recorded) = remote().await;

        let created = catalog
            .upsert(product("Bàn gỗ", "bàn gỗ", true))
            .await
            .unwrap();
        let updated = catalog
            .upsert(product("Ghế gỗ", "ghe-go", true))
            .await
            .unwrap();

        assert!(created.created);
        assert_eq!(created.product.id, "remote-1");
        assert_eq!(created.product.slug, "bàn gỗ");
        assert!(!updated.created);
        assert_eq!(
            requests(&recorded),
            vec![
                "PUT /api/products/b%C3%A0n%20g%E1%BB%97",
                "PUT /api/products/ghe-go"
            ]
        );
    }

    #[tokio::test]
    async fn test_remote_error_status_maps_to_upstream() {
        let (catalog, _) = remote().await;

        let get = catalog.get("broken").await;
        let remove = catalog.remove("broken").await;
        let upsert = catalog.upsert(product("Hỏng", "broken", true)).await;

        for err in [get.unwrap_err(), remove.unwrap_err(), upsert.unwrap_err()] {
            assert!(matches!(err, CatalogError::Upstream { status: 500 }));
            assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        }
    }

    #[tokio::test]
    async fn test_remote_undecodable_body_is_decode_error() {
        let (catalog, _) = remote().await;

        let result = catalog.get("garbled").await;

        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }
}
