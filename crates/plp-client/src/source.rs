use std::future::Future;

use plp_core::ProductPage;

use crate::client::ProductsClient;
use crate::error::ClientError;

/// Anything that can serve one page of products for a query.
///
/// [`crate::CatalogStore`] is generic over this so it can run against the
/// HTTP client or an in-memory fake.
pub trait ProductSource {
    /// Fetches up to `limit` products for `query`, skipping the first `skip`.
    /// An empty `query` means "no filter".
    fn fetch_page(
        &self,
        query: &str,
        limit: u32,
        skip: u32,
    ) -> impl Future<Output = Result<ProductPage, ClientError>> + Send;
}

impl ProductSource for ProductsClient {
    fn fetch_page(
        &self,
        query: &str,
        limit: u32,
        skip: u32,
    ) -> impl Future<Output = Result<ProductPage, ClientError>> + Send {
        ProductsClient::fetch_page(self, query, limit, skip)
    }
}
