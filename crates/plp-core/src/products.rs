//! Catalog record types shared by the HTTP client, the store, and the CLI.
//!
//! ## Observed shape from `dummyjson.com/products`
//!
//! Each record carries far more than we keep (`tags`, `reviews`, `meta`,
//! `dimensions`, ...). Unknown fields are ignored on decode.
//!
//! ### `brand`
//! Absent on some records (groceries, for example). Modeled as a plain
//! `String` with `#[serde(default)]`, so a missing brand is `""` and never
//! matches a non-empty brand filter.
//!
//! ### `price` / `rating`
//! JSON numbers with up to two decimals (e.g. `9.99`, `4.94`).

use serde::{Deserialize, Serialize};

/// A single catalog entry. Identity is `id`; every other field may be
/// replaced wholesale by a local edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// Returns `true` if at least one unit is in stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Response body of both the list and search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Server-side match count for the query, before any local filtering.
    pub total: u64,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_remote_record_ignoring_unknown_fields() {
        let body = serde_json::json!({
            "products": [{
                "id": 1,
                "title": "Essence Mascara Lash Princess",
                "description": "Popular mascara.",
                "category": "beauty",
                "price": 9.99,
                "discountPercentage": 7.17,
                "rating": 4.94,
                "stock": 5,
                "tags": ["beauty", "mascara"],
                "brand": "Essence",
                "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/1/thumbnail.png"
            }],
            "total": 194,
            "skip": 0,
            "limit": 1
        });
        let page: ProductPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.total, 194);
        assert_eq!(page.products.len(), 1);
        let p = &page.products[0];
        assert_eq!(p.id, 1);
        assert_eq!(p.brand, "Essence");
        assert_eq!(p.stock, 5);
        assert!((p.price - 9.99).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_brand_defaults_to_empty() {
        let body = serde_json::json!({
            "id": 16,
            "title": "Apple",
            "price": 1.99,
            "stock": 8,
            "category": "groceries"
        });
        let p: Product = serde_json::from_value(body).unwrap();
        assert_eq!(p.brand, "");
        assert!(p.in_stock());
    }

    #[test]
    fn page_without_skip_and_limit_decodes() {
        let page: ProductPage =
            serde_json::from_value(serde_json::json!({"products": [], "total": 0})).unwrap();
        assert!(page.products.is_empty());
        assert!(page.skip.is_none());
        assert!(page.limit.is_none());
    }
}
