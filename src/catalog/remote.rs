use super::error::CatalogError;
use super::protocol::ENDPOINT_PRODUCTS;
use super::source::{CatalogSource, validate};
use super::types::{CatalogFilter, Product, Upsert};
use crate::search::types::Candidate;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use std::time::Duration;

const INITIAL_BACKOFF_MS: u64 = 150;
const MAX_BACKOFF_MS: u64 = 1200;
const MAX_JITTER_MS: u64 = 50;

/// Catalog backed by an upstream product API.
///
/// Every call is a fresh HTTP round trip; nothing is cached between requests.
pub struct RemoteCatalog {
    http_client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    attempts: usize,
}

impl RemoteCatalog {
    pub fn new(base_url: &str, timeout: Duration, attempts: usize) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("catalog url cannot be used as a base: {}", base_url);
        }

        Ok(Self {
            http_client: reqwest::Client::new(),
            base_url,
            timeout,
            attempts: attempts.max(1),
        })
    }

    fn products_url(&self, slug: Option<&str>) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CatalogError::Unavailable(format!("bad base url {}", self.base_url)))?;
            segments
                .pop_if_empty()
                .push(ENDPOINT_PRODUCTS.trim_start_matches('/'));
            if let Some(slug) = slug {
                segments.push(slug);
            }
        }
        Ok(url)
    }

    /// Sends the request built by `build`, retrying transport failures with
    /// exponential backoff and jitter.
    async fn send_with_retry<F>(&self, build: F) -> Result<reqwest::Response, CatalogError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut delay_ms = INITIAL_BACKOFF_MS;

        for attempt in 0..self.attempts {
            match build().timeout(self.timeout).send().await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == self.attempts {
                        return Err(CatalogError::Unavailable(e.to_string()));
                    }
                    tracing::warn!(
                        "Catalog request failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.attempts,
                        e
                    );
                    let jitter = rand::random::<u64>() % MAX_JITTER_MS;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(MAX_BACKOFF_MS);
                }
            }
        }

        Err(CatalogError::Unavailable(
            "retry attempts exhausted".to_string(),
        ))
    }

    async fn list(&self, filter: CatalogFilter) -> Result<Vec<Product>, CatalogError> {
        let url = self.products_url(None)?;
        let response = self
            .send_with_retry(|| {
                let request = self.http_client.get(url.clone());
                match filter.as_query() {
                    Some(pair) => request.query(&[pair]),
                    None => request,
                }
            })
            .await?;

        let products: Vec<Product> = decode(ensure_success(response)?).await?;
        // The upstream filter is advisory; re-apply it locally.
        Ok(products
            .into_iter()
            .filter(|product| filter.accepts(product))
            .collect())
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalog {
    async fn fetch_candidates(&self, filter: CatalogFilter) -> Result<Vec<Candidate>, CatalogError> {
        let products = self.list(filter).await?;
        tracing::debug!("Fetched {} products from {}", products.len(), self.base_url);
        Ok(products.iter().map(Candidate::from).collect())
    }

    async fn upsert(&self, product: Product) -> Result<Upsert, CatalogError> {
        validate(&product)?;
        let url = self.products_url(Some(&product.slug))?;
        let response = self
            .send_with_retry(|| self.http_client.put(url.clone()).json(&product))
            .await?;

        let created = response.status() == StatusCode::CREATED;
        let product = decode(ensure_success(response)?).await?;
        Ok(Upsert { product, created })
    }

    async fn get(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        let url = self.products_url(Some(slug))?;
        let response = self
            .send_with_retry(|| self.http_client.get(url.clone()))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(ensure_success(response)?).await.map(Some)
    }

    async fn remove(&self, slug: &str) -> Result<bool, CatalogError> {
        let url = self.products_url(Some(slug))?;
        let response = self
            .send_with_retry(|| self.http_client.delete(url.clone()))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        ensure_success(response)?;
        Ok(true)
    }

    async fn count(&self) -> Result<usize, CatalogError> {
        Ok(self.list(CatalogFilter::All).await?.len())
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
    if !response.status().is_success() {
        return Err(CatalogError::Upstream {
            status: response.status().as_u16(),
        });
    }
    Ok(response)
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CatalogError> {
    response
        .json::<T>()
        .await
        .map_err(|e| CatalogError::Decode(e.to_string()))
}
