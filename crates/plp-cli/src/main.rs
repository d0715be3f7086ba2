mod browse;
mod edit;
mod interactive;
mod listing;
mod render;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use plp_client::{CatalogStore, ProductsClient};

#[derive(Debug, Parser)]
#[command(name = "plp")]
#[command(about = "Searchable, paginated product catalog browser")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the catalog page by page, optionally for a search query
    Browse {
        /// Search text; empty lists the whole catalog
        #[arg(long, default_value = "")]
        query: String,

        /// Number of pages to load before printing
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Fetch one filtered and sorted listing page
    Listing(listing::ListingArgs),
    /// Load the first page and apply a local edit to one product
    Edit(edit::EditArgs),
    /// Read search text from stdin (debounced); a `+` line loads more
    Interactive,
}

fn build_store(config: &plp_core::AppConfig) -> anyhow::Result<CatalogStore<ProductsClient>> {
    let client = ProductsClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))?;
    Ok(CatalogStore::new(client, config.page_size))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = plp_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        env = %config.env,
        api_base_url = %config.api_base_url,
        page_size = config.page_size,
        "configuration loaded"
    );

    match command {
        Commands::Browse { query, pages } => {
            let store = build_store(&config)?;
            browse::run_browse(&store, &query, pages).await?;
        }
        Commands::Listing(args) => {
            let client = ProductsClient::from_config(&config)
                .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))?;
            listing::run_listing(&client, &args, config.listing_page_size).await?;
        }
        Commands::Edit(args) => {
            let store = build_store(&config)?;
            edit::run_edit(&store, &args).await?;
        }
        Commands::Interactive => {
            let store = build_store(&config)?;
            interactive::run_interactive(&store, config.search_debounce_ms).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
