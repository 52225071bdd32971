//! API utilities for talking to the catalog service.

/// Get the base URL for API requests.
///
/// The catalog service is served from the same origin as the storefront,
/// so this is just the current origin. Empty string if window is not
/// available.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    window.location().origin().unwrap_or_default()
}

/// Build a full API URL from a path.
///
/// # Example
/// ```rust,ignore
/// let url = api_url(&format!("/catalog/{}/view", id));
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}
