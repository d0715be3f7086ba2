use clap::Args;

use plp_client::{CatalogStore, ProductSource};
use plp_core::Product;

use crate::render;

#[derive(Debug, Args)]
pub(crate) struct EditArgs {
    /// Id of the product to edit
    #[arg(long)]
    pub id: u64,

    /// Search text used to load the page holding the product
    #[arg(long, default_value = "")]
    pub query: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub stock: Option<u32>,
}

impl EditArgs {
    /// Copies `original` with every provided field replaced.
    pub(crate) fn apply(&self, original: &Product) -> Product {
        let mut updated = original.clone();
        if let Some(title) = &self.title {
            updated.title.clone_from(title);
        }
        if let Some(price) = self.price {
            updated.price = price;
        }
        if let Some(stock) = self.stock {
            updated.stock = stock;
        }
        updated
    }
}

/// Load the first page for `args.query` and edit one product locally.
///
/// The edit never leaves the process; it only replaces the loaded row.
///
/// # Errors
///
/// Returns an error if the fetch fails or the product is not on the first page.
pub(crate) async fn run_edit<S: ProductSource>(
    store: &CatalogStore<S>,
    args: &EditArgs,
) -> anyhow::Result<()> {
    if args.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        anyhow::bail!("price must be a non-negative number");
    }

    store.search(&args.query).await?;
    let Some(original) = store
        .snapshot()
        .items
        .into_iter()
        .find(|p| p.id == args.id)
    else {
        anyhow::bail!("product {} is not on the first loaded page", args.id);
    };

    let updated = args.apply(&original);
    store.update_product(updated);

    let state = store.snapshot();
    println!("before:");
    render::print_products(std::slice::from_ref(&original));
    println!("after:");
    if let Some(p) = state.items.iter().find(|p| p.id == args.id) {
        render::print_products(std::slice::from_ref(p));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn original() -> Product {
        Product {
            id: 3,
            title: "Powder Canister".to_string(),
            description: "desc".to_string(),
            price: 14.99,
            rating: 3.8,
            stock: 89,
            thumbnail: String::new(),
            brand: "Velvet Touch".to_string(),
            category: "beauty".to_string(),
        }
    }

    #[test]
    fn apply_replaces_only_given_fields() {
        let args = EditArgs {
            id: 3,
            query: String::new(),
            title: None,
            price: Some(9.5),
            stock: Some(0),
        };
        let updated = args.apply(&original());
        assert_eq!(updated.title, "Powder Canister");
        assert!((updated.price - 9.5).abs() < f64::EPSILON);
        assert_eq!(updated.stock, 0);
        assert_eq!(updated.brand, "Velvet Touch");
    }

    #[test]
    fn apply_without_fields_is_identity() {
        let args = EditArgs {
            id: 3,
            query: String::new(),
            title: None,
            price: None,
            stock: None,
        };
        assert_eq!(args.apply(&original()), original());
    }
}
