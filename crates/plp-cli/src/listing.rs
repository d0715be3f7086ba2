//! The `listing` command: one translated, locally filtered page.

use clap::Args;

use plp_client::ProductsClient;
use plp_core::{FilterSpec, SortKey};

use crate::render;

#[derive(Debug, Args)]
pub(crate) struct ListingArgs {
    /// Search text
    #[arg(long)]
    pub q: Option<String>,

    /// Minimum price (inclusive); 0 disables
    #[arg(long)]
    pub min: Option<f64>,

    /// Maximum price (inclusive); 0 disables
    #[arg(long)]
    pub max: Option<f64>,

    /// Keep only these brands (repeatable)
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Keep only products with stock
    #[arg(long)]
    pub in_stock: bool,

    /// Sort order: `lh`, `hl` or `new`
    #[arg(long)]
    pub sort: Option<String>,

    /// One-based page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Start from a listing URL query string, e.g. `q=phone&brand=Apple&stock=1`
    #[arg(long)]
    pub query_string: Option<String>,

    /// Print the page as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ListingArgs {
    /// Builds the filter spec: the query string (if any) first, then each
    /// explicit flag on top of it.
    pub(crate) fn to_spec(&self) -> anyhow::Result<FilterSpec> {
        let mut spec = match &self.query_string {
            Some(qs) => {
                let qs = qs.trim_start_matches('?');
                let url = reqwest::Url::parse(&format!("http://listing.local/?{qs}"))
                    .map_err(|e| anyhow::anyhow!("invalid query string \"{qs}\": {e}"))?;
                FilterSpec::from_query_pairs(url.query_pairs())
            }
            None => FilterSpec::default(),
        };

        if let Some(q) = &self.q {
            spec.search.clone_from(q);
        }
        if let Some(min) = self.min {
            spec.price_min = min;
        }
        if let Some(max) = self.max {
            spec.price_max = max;
        }
        spec.brands.extend(self.brands.iter().cloned());
        if self.in_stock {
            spec.in_stock = true;
        }
        if let Some(sort) = &self.sort {
            spec.sort = SortKey::parse(sort);
        }
        if let Some(page) = self.page {
            spec.page = page.max(1);
        }
        Ok(spec)
    }
}

/// Fetch and print one listing page.
///
/// # Errors
///
/// Returns an error if the query string is malformed or the fetch fails.
pub(crate) async fn run_listing(
    client: &ProductsClient,
    args: &ListingArgs,
    page_size: u32,
) -> anyhow::Result<()> {
    let spec = args.to_spec()?;
    let listing = client.fetch_listing(&spec, page_size).await?;

    if args.json {
        let body = serde_json::json!({
            "products": listing.products,
            "total": listing.total,
            "page": listing.page,
            "total_pages": listing.total_pages(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if listing.products.is_empty() {
        println!("no products on this page match the filters");
    } else {
        render::print_products(&listing.products);
    }
    println!();
    println!(
        "page {} of {} ({} matches before local filters, sort {})",
        listing.page,
        listing.total_pages(),
        listing.total,
        spec.sort
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ListingArgs {
        ListingArgs {
            q: None,
            min: None,
            max: None,
            brands: Vec::new(),
            in_stock: false,
            sort: None,
            page: None,
            query_string: None,
            json: false,
        }
    }

    #[test]
    fn no_flags_gives_default_spec() {
        assert_eq!(args().to_spec().unwrap(), FilterSpec::default());
    }

    #[test]
    fn query_string_is_decoded() {
        let a = ListingArgs {
            query_string: Some("?q=gaming+laptop&brand=Asus&brand=Dell%20Inc&stock=1&page=3".into()),
            ..args()
        };
        let spec = a.to_spec().unwrap();
        assert_eq!(spec.search, "gaming laptop");
        assert_eq!(spec.brands, vec!["Asus", "Dell Inc"]);
        assert!(spec.in_stock);
        assert_eq!(spec.page, 3);
    }

    #[test]
    fn flags_override_query_string() {
        let a = ListingArgs {
            query_string: Some("q=phone&sort=lh&min=5".into()),
            q: Some("tablet".into()),
            sort: Some("hl".into()),
            brands: vec!["Apple".into()],
            ..args()
        };
        let spec = a.to_spec().unwrap();
        assert_eq!(spec.search, "tablet");
        assert_eq!(spec.sort, SortKey::PriceHighLow);
        assert!((spec.price_min - 5.0).abs() < f64::EPSILON);
        assert_eq!(spec.brands, vec!["Apple"]);
    }
}
