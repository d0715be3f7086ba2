//! HTTP client for the catalog's list and search endpoints.

use std::time::Duration;

use reqwest::{Client, Url};

use plp_core::{AppConfig, FilterSpec, ListingPage, ProductPage};

use crate::error::ClientError;
use crate::rate_limit::retry_with_backoff;

/// HTTP client for `GET /products` and `GET /products/search`.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Transient failures are retried with exponential backoff
/// up to `max_retries` additional attempts.
pub struct ProductsClient {
    client: Client,
    /// Always ends with exactly one `/` so `join` appends rather than replaces.
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ProductsClient {
    /// Creates a client with configured base URL, timeout, `User-Agent`, and
    /// retry policy. Set `max_retries` to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` does not parse
    /// as an absolute URL, or [`ClientError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ClientError> {
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`ProductsClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Fetches one page for the incremental catalog.
    ///
    /// An empty `query` hits the list endpoint; anything else hits search.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ClientError::NotFound`]: HTTP 404 (not retried).
    /// - [`ClientError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ClientError::Http`]: network failure after all retries exhausted.
    /// - [`ClientError::Deserialize`]: body does not match `{ products, total }`.
    pub async fn fetch_page(
        &self,
        query: &str,
        limit: u32,
        skip: u32,
    ) -> Result<ProductPage, ClientError> {
        let search = (!query.is_empty()).then_some(query);
        let url = self.page_url(search, limit, skip)?;
        self.get_page(url).await
    }

    /// Fetches one page from the search endpoint, even for an empty `q`.
    ///
    /// # Errors
    ///
    /// Same as [`ProductsClient::fetch_page`].
    pub async fn search_page(
        &self,
        q: &str,
        limit: u32,
        skip: u32,
    ) -> Result<ProductPage, ClientError> {
        let url = self.page_url(Some(q), limit, skip)?;
        self.get_page(url).await
    }

    /// Fetches the page described by `spec` and runs the local
    /// filter/sort pipeline over it.
    ///
    /// # Errors
    ///
    /// Same as [`ProductsClient::fetch_page`].
    pub async fn fetch_listing(
        &self,
        spec: &FilterSpec,
        page_size: u32,
    ) -> Result<ListingPage, ClientError> {
        let params = spec.remote_params(page_size);
        tracing::debug!(
            q = %params.q,
            limit = params.limit,
            skip = params.skip,
            sort = %spec.sort,
            "fetching listing page"
        );
        let remote = self
            .search_page(&params.q, params.limit, params.skip)
            .await?;
        let listing = ListingPage::from_remote(spec, page_size, remote);
        tracing::debug!(
            shown = listing.products.len(),
            total = listing.total,
            "listing page filtered"
        );
        Ok(listing)
    }

    /// Builds the list URL (`search == None`) or the search URL.
    ///
    /// Values are URL-encoded through `Url::query_pairs_mut`.
    pub(crate) fn page_url(
        &self,
        search: Option<&str>,
        limit: u32,
        skip: u32,
    ) -> Result<Url, ClientError> {
        let path = if search.is_some() {
            "products/search"
        } else {
            "products"
        };
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(q) = search {
                pairs.append_pair("q", q);
            }
            pairs
                .append_pair("limit", &limit.to_string())
                .append_pair("skip", &skip.to_string());
        }
        Ok(url)
    }

    async fn get_page(&self, url: Url) -> Result<ProductPage, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ClientError::RateLimited { retry_after_secs });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ClientError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(ClientError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<ProductPage>(&body).map_err(|e| ClientError::Deserialize {
                    context: format!("products page from {url}"),
                    source: e,
                })
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
