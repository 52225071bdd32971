//! Two-way binding between the navigable URL query string and engine state.
//!
//! State is read from the URL once, when a page mounts; after that the flow
//! is one-directional (UI -> state -> URL). Writes go through
//! `history.replaceState`, never push, so transient filter edits do not
//! pollute back/forward navigation.

use std::collections::BTreeMap;

pub type QueryParams = BTreeMap<String, String>;

pub fn decode_query(search: &str) -> QueryParams {
    serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default()
}

/// Encode params as a `?`-prefixed query string, empty string for no params.
pub fn encode_query(params: &QueryParams) -> String {
    if params.is_empty() {
        return String::new();
    }
    serde_qs::to_string(params)
        .map(|qs| format!("?{}", qs))
        .unwrap_or_default()
}

/// Current query parameters of the window location.
pub fn current_query() -> QueryParams {
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    decode_query(&search)
}

/// Merge `params` into `current`, replacing only the managed keys. A managed
/// key absent from `params` is cleared; anything else in the URL (campaign
/// tags and the like) survives untouched.
pub fn merged_query(mut current: QueryParams, managed: &[&str], params: &QueryParams) -> QueryParams {
    for key in managed {
        current.remove(*key);
    }
    for (key, value) in params {
        current.insert(key.clone(), value.clone());
    }
    current
}

/// Rewrite the managed part of the query string in place (history replace,
/// not push), preserving unmanaged params.
pub fn replace_query(managed: &[&str], params: &QueryParams) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let current = window.location().search().unwrap_or_default();
    let next = encode_query(&merged_query(decode_query(&current), managed, params));
    if current == next {
        return;
    }

    // An empty query clears `?...` by replacing with the bare path.
    let url = if next.is_empty() {
        window.location().pathname().unwrap_or_else(|_| "/".into())
    } else {
        next
    };
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_query() {
        let params = decode_query("?category=men&query=tote%20bag&page=2");
        assert_eq!(params.get("category").map(String::as_str), Some("men"));
        assert_eq!(params.get("query").map(String::as_str), Some("tote bag"));
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_decode_empty_and_malformed() {
        assert!(decode_query("").is_empty());
        assert!(decode_query("?").is_empty());
    }

    #[test]
    fn test_encode_round_trip() {
        let mut params = QueryParams::new();
        params.insert("category".into(), "men".into());
        params.insert("query".into(), "tote bag".into());
        let encoded = encode_query(&params);
        assert!(encoded.starts_with('?'));
        assert_eq!(decode_query(&encoded), params);
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode_query(&QueryParams::new()), "");
    }

    const MANAGED: &[&str] = &["category", "query", "sort", "page"];

    #[test]
    fn test_merge_preserves_foreign_params() {
        let current = decode_query("?utm=campaign&category=men&page=4");
        let mut params = QueryParams::new();
        params.insert("category".into(), "women".into());

        let merged = merged_query(current, MANAGED, &params);
        assert_eq!(merged.get("utm").map(String::as_str), Some("campaign"));
        assert_eq!(merged.get("category").map(String::as_str), Some("women"));
        // a managed key absent from the new params is cleared
        assert!(!merged.contains_key("page"));
    }

    #[test]
    fn test_merge_into_empty_query() {
        let mut params = QueryParams::new();
        params.insert("query".into(), "tote".into());
        let merged = merged_query(QueryParams::new(), MANAGED, &params);
        assert_eq!(merged.get("query").map(String::as_str), Some("tote"));
        assert_eq!(merged.len(), 1);
    }
}
