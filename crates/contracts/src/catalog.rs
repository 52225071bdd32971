//! Catalog wire types shared between the storefront and the catalog service.

use serde::{Deserialize, Serialize};

// ============================================================================
// Product
// ============================================================================

/// A catalog product as delivered by `GET /catalog` and `GET /catalog/:id`.
///
/// Immutable once loaded; the page that fetched the collection owns it.
/// `price` stays a localized currency string on purpose — the numeric value
/// is derived on demand via [`Product::price_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub popularity: String,
    #[serde(default)]
    pub collection: String,
}

impl Product {
    /// Numeric value of the localized price string, `None` when unparseable.
    pub fn price_value(&self) -> Option<f64> {
        parse_price(&self.price)
    }
}

/// Parse a localized currency string into its numeric value.
///
/// Strips currency symbols and thousands separators; the last `.` or `,`
/// followed by one or two digits is taken as the decimal separator.
///
/// ```
/// use contracts::catalog::parse_price;
/// assert_eq!(parse_price("24 000,00 ₽"), Some(24000.0));
/// assert_eq!(parse_price("$1,299.50"), Some(1299.5));
/// ```
pub fn parse_price(raw: &str) -> Option<f64> {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
        .collect();
    if filtered.is_empty() {
        return None;
    }

    // Decide which separator (if any) is the decimal point.
    let decimal_pos = filtered
        .rfind(['.', ','])
        .filter(|&pos| {
            let tail = &filtered[pos + 1..];
            !tail.is_empty() && tail.len() <= 2 && tail.chars().all(|c| c.is_ascii_digit())
        });

    let mut normalized = String::with_capacity(filtered.len());
    for (i, c) in filtered.char_indices() {
        match c {
            '.' | ',' => {
                if Some(i) == decimal_pos {
                    normalized.push('.');
                }
                // thousands separator, dropped
            }
            _ => normalized.push(c),
        }
    }
    normalized.parse::<f64>().ok()
}

// ============================================================================
// Paged results & facet vocabularies
// ============================================================================

/// Paged product result of `GET /catalog`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagedProducts {
    #[serde(default)]
    pub items: Vec<Product>,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub pages: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub total: usize,
}

/// Server-provided facet vocabularies (`GET /catalog/meta`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetMeta {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default)]
    pub popularity: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_localized() {
        assert_eq!(parse_price("24 000,00 ₽"), Some(24000.0));
        assert_eq!(parse_price("1 234 567,89 ₽"), Some(1234567.89));
        assert_eq!(parse_price("$1,299.50"), Some(1299.5));
        assert_eq!(parse_price("€12.99"), Some(12.99));
    }

    #[test]
    fn test_parse_price_plain() {
        assert_eq!(parse_price("24000"), Some(24000.0));
        assert_eq!(parse_price("0"), Some(0.0));
        // three digits after the separator is a thousands group, not cents
        assert_eq!(parse_price("1,299"), Some(1299.0));
        assert_eq!(parse_price("1.299"), Some(1299.0));
    }

    #[test]
    fn test_parse_price_unparseable() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("n/a"), None);
        assert_eq!(parse_price("₽"), None);
    }

    #[test]
    fn test_product_price_value() {
        let product = Product {
            id: 1,
            slug: "tote".into(),
            name: "Tote".into(),
            price: "2 400,00 ₽".into(),
            image: String::new(),
            categories: vec![],
            material: String::new(),
            popularity: String::new(),
            collection: String::new(),
        };
        assert_eq!(product.price_value(), Some(2400.0));
    }
}
