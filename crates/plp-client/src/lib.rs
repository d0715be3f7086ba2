pub mod client;
pub mod debounce;
pub mod error;
mod rate_limit;
pub mod source;
pub mod store;

pub use client::ProductsClient;
pub use debounce::{debounce, SEARCH_DEBOUNCE};
pub use error::ClientError;
pub use source::ProductSource;
pub use store::{CatalogState, CatalogStore, LoadOutcome, SkipReason};
