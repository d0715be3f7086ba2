use plp_client::CatalogState;
use plp_core::Product;

const TITLE_WIDTH: usize = 48;

pub(crate) fn print_products(products: &[Product]) {
    println!("{:<7}{:>10}  {:>6}  {:<18}TITLE", "ID", "PRICE", "STOCK", "BRAND");
    for p in products {
        print_product_row(p);
    }
}

pub(crate) fn print_product_row(p: &Product) {
    let title = if p.title.chars().count() > TITLE_WIDTH {
        format!("{}...", p.title.chars().take(TITLE_WIDTH).collect::<String>())
    } else {
        p.title.clone()
    };
    let brand = if p.brand.is_empty() { "-" } else { p.brand.as_str() };
    println!(
        "{:<7}{:>10.2}  {:>6}  {:<18}{}",
        p.id, p.price, p.stock, brand, title
    );
}

/// One-line pagination summary for the incremental catalog.
pub(crate) fn state_summary(state: &CatalogState) -> String {
    let query = if state.query.is_empty() {
        "(all)".to_string()
    } else {
        format!("\"{}\"", state.query)
    };
    let mut line = format!(
        "query {query}: {} items loaded over {} page(s), {}",
        state.items.len(),
        state.page,
        if state.has_more {
            "more available"
        } else {
            "end of results"
        }
    );
    if let Some(err) = &state.last_error {
        line.push_str(&format!("; last fetch failed: {err}"));
    }
    line
}
