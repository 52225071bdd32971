//! HTTP client for the catalog service.
//!
//! All requests go out with credentials included. List fetches are
//! abortable: [`ListRequestGuard`] keeps the in-flight request's controller
//! and aborts it when a newer request supersedes it, so a stale response
//! can never overwrite fresher state.

use contracts::catalog::{FacetMeta, PagedProducts, Product};
use gloo_net::http::Request;
use leptos::prelude::*;
use serde::Serialize;
use web_sys::{AbortController, AbortSignal, RequestCredentials};

use crate::shared::api_utils::api_url;

use super::state::{FilterState, SortKey};

/// The collection is fetched whole and faceted client-side; the limit only
/// bounds a runaway response.
const COLLECTION_LIMIT: usize = 500;

/// Query parameters of `GET /catalog`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CatalogRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Comma-joined multi-select values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<String>,
    #[serde(rename = "priceMin", skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(rename = "priceMax", skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

fn join(values: &std::collections::BTreeSet<String>) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().cloned().collect::<Vec<_>>().join(","))
    }
}

impl CatalogRequest {
    /// The active filter expressed in the server-side query contract, so the
    /// service can pre-narrow the collection it returns.
    pub fn from_filter(filter: &FilterState) -> Self {
        Self {
            limit: Some(COLLECTION_LIMIT),
            q: (!filter.query.is_empty()).then(|| filter.query.clone()),
            categories: (!filter.category.is_empty()).then(|| filter.category.clone()),
            materials: join(&filter.material),
            collections: join(&filter.collection),
            popularity: join(&filter.popularity),
            price_min: (filter.price_min > 0.0).then_some(filter.price_min),
            price_max: filter.price_max,
            sort: (filter.sort != SortKey::None).then(|| filter.sort.as_str().to_string()),
        }
    }

    pub fn to_query_string(&self) -> String {
        serde_qs::to_string(self).unwrap_or_default()
    }
}

/// Result of a by-id fetch; a 404 is an explicit state, not an error.
#[derive(Debug, Clone)]
pub enum ProductFetch {
    Found(Box<Product>),
    NotFound,
}

async fn send_json<T: serde::de::DeserializeOwned>(
    request: gloo_net::http::RequestBuilder,
) -> Result<T, String> {
    let response = request
        .credentials(RequestCredentials::Include)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("request failed with status {}", response.status()));
    }
    response.json::<T>().await.map_err(|e| e.to_string())
}

pub async fn fetch_catalog(
    request: &CatalogRequest,
    signal: Option<&AbortSignal>,
) -> Result<PagedProducts, String> {
    let qs = request.to_query_string();
    let url = if qs.is_empty() {
        api_url("/catalog")
    } else {
        format!("{}?{}", api_url("/catalog"), qs)
    };
    send_json(Request::get(&url).abort_signal(signal)).await
}

pub async fn fetch_product(id: i64) -> Result<ProductFetch, String> {
    let response = Request::get(&api_url(&format!("/catalog/{}", id)))
        .credentials(RequestCredentials::Include)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status() == 404 {
        return Ok(ProductFetch::NotFound);
    }
    if !response.ok() {
        return Err(format!("request failed with status {}", response.status()));
    }
    response
        .json::<Product>()
        .await
        .map(|p| ProductFetch::Found(Box::new(p)))
        .map_err(|e| e.to_string())
}

pub async fn fetch_meta() -> Result<FacetMeta, String> {
    send_json(Request::get(&api_url("/catalog/meta"))).await
}

/// Holds the in-flight list request's controller so a reload can abort it.
#[derive(Clone, Copy)]
pub struct ListRequestGuard {
    controller: StoredValue<Option<AbortController>, LocalStorage>,
}

impl Default for ListRequestGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl ListRequestGuard {
    pub fn new() -> Self {
        Self {
            controller: StoredValue::new_local(None),
        }
    }

    /// Abort the previous request, if any, and hand out the signal for the
    /// next one.
    pub fn begin(&self) -> Option<AbortSignal> {
        let next = AbortController::new().ok();
        let signal = next.as_ref().map(|c| c.signal());
        self.controller.update_value(|slot| {
            if let Some(previous) = slot.take() {
                previous.abort();
            }
            *slot = next;
        });
        signal
    }

    pub fn finish(&self) {
        self.controller.update_value(|slot| {
            *slot = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_request_query_string() {
        let mut filter = FilterState::default();
        filter.category = "men".into();
        filter.query = "tote".into();
        filter.material = BTreeSet::from(["canvas".to_string(), "leather".to_string()]);
        filter.price_min = 100.0;
        filter.price_max = Some(25000.0);
        filter.sort = SortKey::PriceAsc;

        let qs = CatalogRequest::from_filter(&filter).to_query_string();
        assert!(qs.contains(&format!("limit={}", COLLECTION_LIMIT)));
        assert!(qs.contains("q=tote"));
        assert!(qs.contains("categories=men"));
        assert!(qs.contains("materials=canvas%2Cleather"));
        assert!(qs.contains("priceMin=100"));
        assert!(qs.contains("priceMax=25000"));
        assert!(qs.contains("sort=price_asc"));
        assert!(!qs.contains("page="));
    }

    #[test]
    fn test_default_filter_sends_only_limit() {
        let qs = CatalogRequest::from_filter(&FilterState::default()).to_query_string();
        assert_eq!(qs, format!("limit={}", COLLECTION_LIMIT));
    }
}
