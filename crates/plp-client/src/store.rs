//! Incremental catalog state machine: paginated loading, query replacement,
//! and optimistic local edits.
//!
//! All state lives in one [`CatalogState`] published through a
//! `tokio::sync::watch` channel. Every transition runs inside a single
//! `send_if_modified`/`send_modify` closure, so readers never observe a
//! half-applied change and no lock is held across the network await.
//!
//! ## Stale responses
//!
//! Each [`CatalogStore::search`] bumps the state's generation. A fetch
//! remembers the generation it started under and its result is merged only
//! if the generation still matches; otherwise it is dropped and
//! [`LoadOutcome::Stale`] is returned.
//!
//! Dropping a `load_more` future before the fetch settles clears `loading`
//! for its generation, so a cancelled fetch never wedges the store.

use std::collections::HashSet;

use tokio::sync::watch;

use plp_core::{Product, ProductPage};

use crate::error::ClientError;
use crate::source::ProductSource;

/// Snapshot of the catalog held by a [`CatalogStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    /// Loaded products for `query`, in server order, no duplicate ids.
    pub items: Vec<Product>,
    /// Number of pages already fetched for `query`.
    pub page: u32,
    pub query: String,
    pub loading: bool,
    pub has_more: bool,
    /// Message of the last failed fetch for `query`; cleared by the next
    /// successful fetch or by a new search.
    pub last_error: Option<String>,
    generation: u64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            query: String::new(),
            loading: false,
            has_more: true,
            last_error: None,
            generation: 0,
        }
    }
}

/// Why a `load_more` call did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A fetch for the current query is already in flight.
    Busy,
    /// Every item the server reported has been loaded.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { appended: usize, total: u64 },
    Skipped(SkipReason),
    /// The query changed while the fetch was in flight; its result was dropped.
    Stale,
}

/// What a fetch needs to remember between start and merge.
#[derive(Debug, Clone)]
struct FetchTicket {
    generation: u64,
    query: String,
    skip: u32,
}

impl CatalogState {
    /// Stamp of the current query; bumped by every reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn begin_fetch(&mut self, page_size: u32) -> Result<FetchTicket, SkipReason> {
        if self.loading {
            return Err(SkipReason::Busy);
        }
        if !self.has_more {
            return Err(SkipReason::Exhausted);
        }
        self.loading = true;
        Ok(FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            skip: self.page.saturating_mul(page_size),
        })
    }

    fn merge(&mut self, ticket: &FetchTicket, page: ProductPage) -> LoadOutcome {
        if ticket.generation != self.generation {
            return LoadOutcome::Stale;
        }

        let returned = page.products.len();
        let before = self.items.len();
        let mut seen: HashSet<u64> = self.items.iter().map(|p| p.id).collect();
        self.items.extend(page.products.into_iter().filter(|p| seen.insert(p.id)));

        self.page += 1;
        // An empty page ends pagination even if `total` was never reached.
        self.has_more = returned > 0 && (self.items.len() as u64) < page.total;
        self.loading = false;
        self.last_error = None;

        LoadOutcome::Loaded {
            appended: self.items.len() - before,
            total: page.total,
        }
    }

    /// Returns `false` if the ticket is stale and nothing was recorded.
    fn fail(&mut self, ticket: &FetchTicket, err: &ClientError) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.loading = false;
        self.last_error = Some(err.to_string());
        true
    }

    /// Releases `loading` for a fetch that was dropped before settling.
    fn abandon(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.loading {
            return false;
        }
        self.loading = false;
        true
    }

    fn reset(&mut self, query: &str) {
        self.generation = self.generation.wrapping_add(1);
        self.items.clear();
        self.page = 0;
        query.clone_into(&mut self.query);
        self.loading = false;
        self.has_more = true;
        self.last_error = None;
    }

    fn replace_item(&mut self, updated: Product) -> bool {
        match self.items.iter_mut().find(|p| p.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }
}

/// Held across the fetch await; clears `loading` on drop unless disarmed.
struct InFlight<'a> {
    state: &'a watch::Sender<CatalogState>,
    generation: u64,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let generation = self.generation;
        if self.state.send_if_modified(|s| s.abandon(generation)) {
            tracing::debug!(generation, "catalog fetch dropped before completion");
        }
    }
}

/// Single owner of [`CatalogState`]; serializes page loads so at most one
/// fetch per query is in flight.
pub struct CatalogStore<S> {
    source: S,
    page_size: u32,
    state: watch::Sender<CatalogState>,
}

impl<S: ProductSource> CatalogStore<S> {
    /// Creates a store with default state. A `page_size` of `0` is raised to `1`.
    pub fn new(source: S, page_size: u32) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self {
            source,
            page_size: page_size.max(1),
            state,
        }
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Clones the current state.
    #[must_use]
    pub fn snapshot(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    /// Fetches the next page of the current query and appends it.
    ///
    /// Returns [`LoadOutcome::Skipped`] without fetching while a load is in
    /// flight or once the query is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the source's [`ClientError`] if the fetch for the current
    /// query fails. `loading` is reset and the message is kept in
    /// [`CatalogState::last_error`]; items and page are left untouched.
    pub async fn load_more(&self) -> Result<LoadOutcome, ClientError> {
        let page_size = self.page_size;
        let mut begin = Err(SkipReason::Busy);
        self.state.send_if_modified(|s| {
            begin = s.begin_fetch(page_size);
            begin.is_ok()
        });

        let ticket = match begin {
            Ok(ticket) => ticket,
            Err(reason) => {
                tracing::debug!(?reason, "load_more skipped");
                return Ok(LoadOutcome::Skipped(reason));
            }
        };

        tracing::debug!(
            query = %ticket.query,
            skip = ticket.skip,
            limit = page_size,
            generation = ticket.generation,
            "fetching catalog page"
        );

        let mut in_flight = InFlight {
            state: &self.state,
            generation: ticket.generation,
            armed: true,
        };
        let result = self
            .source
            .fetch_page(&ticket.query, page_size, ticket.skip)
            .await;
        in_flight.disarm();

        match result {
            Ok(page) => {
                let mut outcome = LoadOutcome::Stale;
                self.state.send_if_modified(|s| {
                    outcome = s.merge(&ticket, page);
                    outcome != LoadOutcome::Stale
                });
                match outcome {
                    LoadOutcome::Stale => tracing::debug!(
                        query = %ticket.query,
                        generation = ticket.generation,
                        "dropping stale catalog page"
                    ),
                    LoadOutcome::Loaded { appended, total } => tracing::debug!(
                        query = %ticket.query,
                        appended,
                        total,
                        "catalog page merged"
                    ),
                    LoadOutcome::Skipped(_) => {}
                }
                Ok(outcome)
            }
            Err(err) => {
                let mut recorded = false;
                self.state.send_if_modified(|s| {
                    recorded = s.fail(&ticket, &err);
                    recorded
                });
                if recorded {
                    tracing::warn!(query = %ticket.query, error = %err, "catalog fetch failed");
                    Err(err)
                } else {
                    tracing::debug!(
                        query = %ticket.query,
                        error = %err,
                        "ignoring failure of superseded fetch"
                    );
                    Ok(LoadOutcome::Stale)
                }
            }
        }
    }

    /// Replaces the query, resetting items, page and flags before fetching
    /// the first page for it.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogStore::load_more`].
    pub async fn search(&self, query: &str) -> Result<LoadOutcome, ClientError> {
        self.state.send_modify(|s| s.reset(query));
        tracing::debug!(query, "catalog query replaced");
        self.load_more().await
    }

    /// Clears the recorded failure and tries the next page again.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogStore::load_more`].
    pub async fn retry(&self) -> Result<LoadOutcome, ClientError> {
        self.state.send_if_modified(|s| s.last_error.take().is_some());
        self.load_more().await
    }

    /// Replaces the loaded item with the same id, in place.
    ///
    /// Returns `false` (and changes nothing) when no loaded item has that id.
    pub fn update_product(&self, updated: Product) -> bool {
        let id = updated.id;
        let matched = self.state.send_if_modified(|s| s.replace_item(updated));
        if !matched {
            tracing::debug!(id, "update for product not in loaded window ignored");
        }
        matched
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
