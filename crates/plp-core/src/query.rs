//! Filter/sort specification for the product listing page and its
//! translation into remote request parameters plus a local pipeline.
//!
//! The remote API only understands a free-text query, `limit` and `skip`.
//! Price range, brand membership and stock filtering, and every sort order,
//! are applied locally to the single page that came back.
//!
//! ## Accepted approximation
//!
//! Local filtering sees one fetched page, never the full result set, and
//! [`ListingPage::total`] is the server's *unfiltered* match count. A
//! restrictive filter can therefore yield a short (even empty) page while
//! `total_pages()` still reports more pages.

use std::fmt;

use crate::products::{Product, ProductPage};

/// Sort order applied to a fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// `lh`: ascending by price.
    PriceLowHigh,
    /// `hl`: descending by price.
    PriceHighLow,
    /// `new`: descending by id.
    #[default]
    Newest,
}

impl SortKey {
    /// Parses a sort code. Anything other than `lh` and `hl` (including
    /// `new`, the empty string and unknown codes) is [`SortKey::Newest`].
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code {
            "lh" => SortKey::PriceLowHigh,
            "hl" => SortKey::PriceHighLow,
            _ => SortKey::Newest,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::PriceLowHigh => "lh",
            SortKey::PriceHighLow => "hl",
            SortKey::Newest => "new",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one request against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteParams {
    pub q: String,
    pub limit: u32,
    pub skip: u32,
}

/// User-facing filter state of the listing page.
///
/// Zero prices, an empty brand set and `in_stock == false` all mean
/// "criterion unset".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub search: String,
    pub price_min: f64,
    pub price_max: f64,
    pub brands: Vec<String>,
    pub in_stock: bool,
    pub sort: SortKey,
    /// One-based page number.
    pub page: u32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            price_min: 0.0,
            price_max: 0.0,
            brands: Vec::new(),
            in_stock: false,
            sort: SortKey::Newest,
            page: 1,
        }
    }
}

impl FilterSpec {
    /// Builds a spec from URL query pairs (`page`, `q`, `sort`, `min`,
    /// `max`, `stock`, repeated `brand`).
    ///
    /// The first occurrence of a scalar key wins. Values that do not parse
    /// fall back to the default for that key; `stock` is only set by `"1"`.
    #[must_use]
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k.as_ref() == key)
                .map(|(_, v)| v.as_ref())
        };
        let price = |key: &str| {
            first(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|p| p.is_finite())
                .unwrap_or(0.0)
        };

        let page = first("page")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);

        Self {
            search: first("q").unwrap_or_default().to_string(),
            price_min: price("min"),
            price_max: price("max"),
            brands: pairs
                .iter()
                .filter(|(k, _)| k.as_ref() == "brand")
                .map(|(_, v)| v.as_ref().to_string())
                .collect(),
            in_stock: first("stock") == Some("1"),
            sort: SortKey::parse(first("sort").unwrap_or_default()),
            page,
        }
    }

    /// Inverse of [`FilterSpec::from_query_pairs`]; keys holding their
    /// default value are omitted.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if !self.search.is_empty() {
            pairs.push(("q", self.search.clone()));
        }
        if self.sort != SortKey::Newest {
            pairs.push(("sort", self.sort.to_string()));
        }
        if self.price_min > 0.0 {
            pairs.push(("min", self.price_min.to_string()));
        }
        if self.price_max > 0.0 {
            pairs.push(("max", self.price_max.to_string()));
        }
        if self.in_stock {
            pairs.push(("stock", "1".to_string()));
        }
        for brand in &self.brands {
            pairs.push(("brand", brand.clone()));
        }
        pairs
    }

    pub fn with_search(&mut self, q: &str) {
        q.clone_into(&mut self.search);
        self.page = 1;
    }

    /// Adds `brand` to the selection, or removes it if already selected.
    pub fn toggle_brand(&mut self, brand: &str) {
        if let Some(pos) = self.brands.iter().position(|b| b == brand) {
            self.brands.remove(pos);
        } else {
            self.brands.push(brand.to_string());
        }
        self.page = 1;
    }

    pub fn with_in_stock(&mut self, in_stock: bool) {
        self.in_stock = in_stock;
        self.page = 1;
    }

    pub fn with_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn with_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Remote parameters for the requested page: `skip = (page - 1) * page_size`.
    #[must_use]
    pub fn remote_params(&self, page_size: u32) -> RemoteParams {
        RemoteParams {
            q: self.search.clone(),
            limit: page_size,
            skip: self.page.max(1).saturating_sub(1).saturating_mul(page_size),
        }
    }
}

/// Filters then sorts one fetched page.
///
/// Stages run in a fixed order (min price, max price, brand, stock) and
/// each is skipped when its criterion is unset. Sorting is stable.
#[must_use]
pub fn apply_local_pipeline(spec: &FilterSpec, products: Vec<Product>) -> Vec<Product> {
    let mut filtered: Vec<Product> = products
        .into_iter()
        .filter(|p| spec.price_min <= 0.0 || p.price >= spec.price_min)
        .filter(|p| spec.price_max <= 0.0 || p.price <= spec.price_max)
        .filter(|p| spec.brands.is_empty() || spec.brands.iter().any(|b| *b == p.brand))
        .filter(|p| !spec.in_stock || p.in_stock())
        .collect();

    match spec.sort {
        SortKey::PriceLowHigh => filtered.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceHighLow => filtered.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::Newest => filtered.sort_by(|a, b| b.id.cmp(&a.id)),
    }
    filtered
}

/// One rendered page of the listing: post-filter products plus the
/// pagination metadata computed from the server total.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub products: Vec<Product>,
    /// Unfiltered server-side match count for the search text.
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl ListingPage {
    /// Runs the local pipeline over a raw remote page.
    #[must_use]
    pub fn from_remote(spec: &FilterSpec, page_size: u32, remote: ProductPage) -> Self {
        Self {
            products: apply_local_pipeline(spec, remote.products),
            total: remote.total,
            page: spec.page.max(1),
            page_size,
        }
    }

    /// `ceil(total / page_size)`.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
