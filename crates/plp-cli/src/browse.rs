use plp_client::{CatalogStore, LoadOutcome, ProductSource};

use crate::render;

/// Search for `query` and keep loading until `pages` pages are held or the
/// server has nothing more.
///
/// # Errors
///
/// Returns an error if any page fetch fails.
pub(crate) async fn run_browse<S: ProductSource>(
    store: &CatalogStore<S>,
    query: &str,
    pages: u32,
) -> anyhow::Result<()> {
    let mut outcome = store.search(query).await?;
    for _ in 1..pages {
        if matches!(outcome, LoadOutcome::Skipped(_)) {
            break;
        }
        outcome = store.load_more().await?;
    }

    let state = store.snapshot();
    if state.items.is_empty() {
        println!("no products found for \"{query}\"");
        return Ok(());
    }
    render::print_products(&state.items);
    println!();
    println!("{}", render::state_summary(&state));
    Ok(())
}
