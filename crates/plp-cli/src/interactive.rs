//! Line-driven stand-in for the listing UI.
//!
//! Every stdin line is treated as the current contents of the search box.
//! Lines are debounced so a quick burst issues one search. A line holding
//! only `+` is the scroll threshold: it loads the next page, or retries the
//! last failed fetch.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use plp_client::{debounce, CatalogStore, ClientError, LoadOutcome, ProductSource, SkipReason};

use crate::render;

const LOAD_MORE: &str = "+";

/// Run the interactive loop until stdin closes and pending searches drain.
///
/// # Errors
///
/// Returns an error only if reading stdin fails; fetch failures are printed
/// and can be retried with `+`.
pub(crate) async fn run_interactive<S: ProductSource>(
    store: &CatalogStore<S>,
    debounce_ms: u64,
) -> anyhow::Result<()> {
    let (search_tx, search_rx) = mpsc::channel::<String>(32);
    let mut search_tx = Some(search_tx);
    let mut searches = debounce(search_rx, Duration::from_millis(debounce_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("type to search, `{LOAD_MORE}` for more, ctrl-d to quit");
    report(store, store.load_more().await);

    loop {
        tokio::select! {
            line = lines.next_line(), if search_tx.is_some() => {
                match line? {
                    Some(line) if line.trim() == LOAD_MORE => {
                        let result = if store.snapshot().last_error.is_some() {
                            store.retry().await
                        } else {
                            store.load_more().await
                        };
                        report(store, result);
                    }
                    Some(line) => {
                        if let Some(tx) = &search_tx {
                            if tx.send(line.trim().to_string()).await.is_err() {
                                break;
                            }
                        }
                    }
                    // Closing the sender flushes the last pending search.
                    None => search_tx = None,
                }
            }
            query = searches.recv() => {
                match query {
                    Some(query) => report(store, store.search(&query).await),
                    None => break,
                }
            }
        }
    }
    Ok(())
}

fn report<S: ProductSource>(store: &CatalogStore<S>, result: Result<LoadOutcome, ClientError>) {
    match result {
        Ok(LoadOutcome::Loaded { .. }) => {
            let state = store.snapshot();
            render::print_products(&state.items);
            println!("{}", render::state_summary(&state));
        }
        Ok(LoadOutcome::Skipped(SkipReason::Exhausted)) => println!("no more results"),
        Ok(LoadOutcome::Skipped(SkipReason::Busy) | LoadOutcome::Stale) => {}
        Err(e) => eprintln!("fetch failed: {e} (type `{LOAD_MORE}` to retry)"),
    }
}
