//! The catalog query engine: filtered + sorted + paginated view of the
//! product collection.
//!
//! All predicates are ANDed; within a multi-select facet the selected
//! values are OR (a product needs one matching value, not all). Sorting is
//! stable, so the absence of a sort key preserves source order and ties
//! keep their relative position.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use contracts::catalog::Product;

use super::state::{FilterState, SortKey};

fn matches_category(product: &Product, category: &str) -> bool {
    category.is_empty() || product.categories.iter().any(|c| c == category)
}

fn matches_query(product: &Product, query: &str) -> bool {
    query.is_empty()
        || product
            .name
            .to_lowercase()
            .contains(&query.to_lowercase())
}

fn matches_facet(value: &str, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || selected.contains(value)
}

fn matches_price(product: &Product, filter: &FilterState) -> bool {
    if !filter.has_price_filter() {
        return true;
    }
    let Some(price) = product.price_value() else {
        // an unparseable price cannot satisfy an active range
        return false;
    };
    price >= filter.price_min && filter.price_max.is_none_or(|max| price <= max)
}

/// True iff the product satisfies every active facet predicate.
pub fn matches(product: &Product, filter: &FilterState) -> bool {
    matches_category(product, &filter.category)
        && matches_query(product, &filter.query)
        && matches_facet(&product.popularity, &filter.popularity)
        && matches_facet(&product.material, &filter.material)
        && matches_facet(&product.collection, &filter.collection)
        && matches_price(product, filter)
}

fn cmp_price(a: &Product, b: &Product, descending: bool) -> Ordering {
    match (a.price_value(), b.price_value()) {
        (Some(pa), Some(pb)) => {
            let ord = pa.partial_cmp(&pb).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        // unparseable prices sort last regardless of direction
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by the active sort key; `SortKey::None` leaves source order.
pub fn sort_products(products: &mut [Product], sort: SortKey) {
    match sort {
        SortKey::None => {}
        SortKey::NameAsc => {
            products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        SortKey::NameDesc => {
            products.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
        }
        SortKey::PriceAsc => products.sort_by(|a, b| cmp_price(a, b, false)),
        SortKey::PriceDesc => products.sort_by(|a, b| cmp_price(a, b, true)),
    }
}

/// Derive the filtered + sorted view of the collection.
pub fn apply(products: &[Product], filter: &FilterState) -> Vec<Product> {
    let mut out: Vec<Product> = products
        .iter()
        .filter(|p| matches(p, filter))
        .cloned()
        .collect();
    sort_products(&mut out, filter.sort);
    out
}

/// Slice of a 1-based page. Out-of-range pages yield an empty slice.
pub fn page_slice(items: &[Product], page: usize, size: usize) -> &[Product] {
    let start = (page.max(1) - 1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

pub fn page_count(total: usize, size: usize) -> usize {
    total.div_ceil(size)
}
