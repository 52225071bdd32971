//! Catalog list state: active facets, sort key and page.
//!
//! Pure state with explicit transitions; the UI holds it in an `RwSignal`.
//! Every facet/query/sort mutation resets the page to 1 so switching
//! filters can never leave the user on an out-of-range page.

use std::collections::BTreeSet;

use crate::shared::url_state::QueryParams;

pub const PAGE_SIZE: usize = 12;

/// The query-string keys this state owns. URL rewrites touch only these;
/// anything else in the query survives.
pub const MANAGED_PARAMS: &[&str] = &["category", "query", "sort", "page"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    None,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    /// Token used in the URL and the remote contract. Empty for no sort.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::None => "",
            SortKey::NameAsc => "name_asc",
            SortKey::NameDesc => "name_desc",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
        }
    }

    /// Parse a sort token; anything unknown falls back to no sort.
    pub fn parse(token: &str) -> Self {
        match token {
            "name_asc" => SortKey::NameAsc,
            "name_desc" => SortKey::NameDesc,
            "price_asc" => SortKey::PriceAsc,
            "price_desc" => SortKey::PriceDesc,
            _ => SortKey::None,
        }
    }
}

/// Active filter facets. Multi-select facets are sets: membership is
/// deduplicated and insertion order is irrelevant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    /// Single-select category slug, empty = no filter.
    pub category: String,
    /// Case-insensitive substring match against the product name.
    pub query: String,
    pub sort: SortKey,
    pub popularity: BTreeSet<String>,
    pub material: BTreeSet<String>,
    pub collection: BTreeSet<String>,
    /// Inclusive price range; `None` max = unbounded.
    pub price_min: f64,
    pub price_max: Option<f64>,
}

impl FilterState {
    pub fn has_price_filter(&self) -> bool {
        self.price_min > 0.0 || self.price_max.is_some()
    }
}

/// Clamp user-supplied price bounds: negatives to zero, and an inverted
/// range collapses onto its minimum instead of being rejected.
pub fn clamped_range(min: f64, max: Option<f64>) -> (f64, Option<f64>) {
    let min = if min.is_finite() { min.max(0.0) } else { 0.0 };
    let max = max.filter(|m| m.is_finite()).map(|m| m.max(min));
    (min, max)
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogListState {
    pub filter: FilterState,
    /// 1-based page index.
    pub page: usize,
}

impl Default for CatalogListState {
    fn default() -> Self {
        Self {
            filter: FilterState::default(),
            page: 1,
        }
    }
}

impl CatalogListState {
    pub fn set_category(&mut self, category: String) {
        self.filter.category = category;
        self.page = 1;
    }

    pub fn set_query(&mut self, query: String) {
        self.filter.query = query;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.filter.sort = sort;
        self.page = 1;
    }

    pub fn set_popularity(&mut self, selected: BTreeSet<String>) {
        self.filter.popularity = selected;
        self.page = 1;
    }

    pub fn set_material(&mut self, selected: BTreeSet<String>) {
        self.filter.material = selected;
        self.page = 1;
    }

    pub fn set_collection(&mut self, selected: BTreeSet<String>) {
        self.filter.collection = selected;
        self.page = 1;
    }

    pub fn set_price_range(&mut self, min: f64, max: Option<f64>) {
        let (min, max) = clamped_range(min, max);
        self.filter.price_min = min;
        self.filter.price_max = max;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Clear every facet, the query and the sort back to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Seed state from URL query parameters on mount. Only the parameters
    /// of the navigable contract (`category`, `query`, `sort`, `page`) are
    /// URL-bound; multi-select facets and the price range always start
    /// empty.
    pub fn from_query(params: &QueryParams) -> Self {
        let mut state = Self::default();
        if let Some(category) = params.get("category") {
            state.filter.category = category.clone();
        }
        if let Some(query) = params.get("query") {
            state.filter.query = query.clone();
        }
        if let Some(sort) = params.get("sort") {
            state.filter.sort = SortKey::parse(sort);
        }
        if let Some(page) = params.get("page").and_then(|p| p.parse::<usize>().ok()) {
            state.page = page.max(1);
        }
        state
    }

    /// Navigable representation of the current state. Defaults are omitted
    /// so an untouched catalog keeps a clean URL; page 1 is implicit.
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if !self.filter.category.is_empty() {
            params.insert("category".into(), self.filter.category.clone());
        }
        if !self.filter.query.is_empty() {
            params.insert("query".into(), self.filter.query.clone());
        }
        if self.filter.sort != SortKey::None {
            params.insert("sort".into(), self.filter.sort.as_str().into());
        }
        if self.page > 1 {
            params.insert("page".into(), self.page.to_string());
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_change_resets_page() {
        let mut state = CatalogListState::default();
        state.set_page(4);
        state.set_category("men".into());
        assert_eq!(state.page, 1);

        state.set_page(3);
        state.set_query("tote".into());
        assert_eq!(state.page, 1);

        state.set_page(2);
        state.set_sort(SortKey::PriceAsc);
        assert_eq!(state.page, 1);

        state.set_page(2);
        state.set_material(BTreeSet::from(["leather".to_string()]));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = CatalogListState::default();
        state.set_category("men".into());
        state.set_query("tote".into());
        state.set_sort(SortKey::NameDesc);
        state.set_popularity(BTreeSet::from(["hit".to_string()]));
        state.set_price_range(100.0, Some(500.0));
        state.set_page(3);

        state.reset();
        assert_eq!(state, CatalogListState::default());
    }

    #[test]
    fn test_price_bounds_clamped() {
        assert_eq!(clamped_range(-5.0, Some(100.0)), (0.0, Some(100.0)));
        // inverted range collapses onto the minimum
        assert_eq!(clamped_range(200.0, Some(100.0)), (200.0, Some(200.0)));
        assert_eq!(clamped_range(f64::NAN, Some(f64::INFINITY)), (0.0, None));
        assert_eq!(clamped_range(0.0, None), (0.0, None));
    }

    #[test]
    fn test_url_seeding() {
        let mut params = QueryParams::new();
        params.insert("category".into(), "men".into());
        params.insert("query".into(), "tote".into());
        params.insert("sort".into(), "price_asc".into());
        params.insert("page".into(), "3".into());

        let state = CatalogListState::from_query(&params);
        assert_eq!(state.filter.category, "men");
        assert_eq!(state.filter.query, "tote");
        assert_eq!(state.filter.sort, SortKey::PriceAsc);
        assert_eq!(state.page, 3);
        // multi-select facets and the price range are not URL-bound
        assert!(state.filter.material.is_empty());
        assert!(!state.filter.has_price_filter());
    }

    #[test]
    fn test_url_seeding_defends_against_garbage() {
        let mut params = QueryParams::new();
        params.insert("sort".into(), "bogus".into());
        params.insert("page".into(), "0".into());
        let state = CatalogListState::from_query(&params);
        assert_eq!(state.filter.sort, SortKey::None);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_to_query_omits_defaults() {
        let state = CatalogListState::default();
        assert!(state.to_query().is_empty());

        let mut state = CatalogListState::default();
        state.set_category("women".into());
        state.set_page(2);
        let params = state.to_query();
        assert_eq!(params.get("category").map(String::as_str), Some("women"));
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
        assert!(!params.contains_key("sort"));

        // changing a facet drops the page parameter again
        state.set_category("men".into());
        assert!(!state.to_query().contains_key("page"));
    }

    #[test]
    fn test_round_trip_through_url() {
        let mut state = CatalogListState::default();
        state.set_query("shoulder bag".into());
        state.set_sort(SortKey::NameAsc);
        state.set_page(5);
        let back = CatalogListState::from_query(&state.to_query());
        assert_eq!(back, state);
    }
}
