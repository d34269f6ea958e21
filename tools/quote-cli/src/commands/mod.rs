//! CLI command implementations.

pub mod config;
pub mod products;
pub mod quote;
pub mod wishlist;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List the catalog.
    List(ListArgs),
    /// List products with an active promotion.
    Discounted(ListArgs),
    /// Show one product.
    Show {
        /// Product id.
        id: String,
    },
}

/// Catalog listing filters.
#[derive(Args, Clone, Default)]
pub struct ListArgs {
    /// Free-text search.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category name.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Minimum per-day price.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum per-day price.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Sort order (newest, price-asc, price-desc, title-asc, title-desc).
    #[arg(long)]
    pub sort: Option<String>,

    /// Page number, starting at 1.
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Products per page.
    #[arg(short, long)]
    pub limit: Option<u32>,
}

/// Arguments for the wishlist command.
#[derive(Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: Option<WishlistCommand>,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Show the wishlist and its total.
    Show,
    /// Add a product.
    Add {
        /// Product id.
        id: String,
        /// Number of units.
        #[arg(short, long, default_value = "1")]
        quantity: u32,
        /// Booking date (YYYY-MM-DD).
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Remove a product.
    Remove {
        /// Product id.
        id: String,
    },
    /// Add a product if absent, remove it otherwise.
    Toggle {
        /// Product id.
        id: String,
    },
    /// Change a line's quantity.
    Qty {
        /// Product id.
        id: String,
        /// New quantity.
        quantity: u32,
    },
    /// Set or clear a line's booking date.
    Date {
        /// Product id.
        id: String,
        /// Booking date (YYYY-MM-DD); omit to clear.
        date: Option<String>,
    },
    /// Empty the wishlist.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    #[command(subcommand)]
    pub command: QuoteCommand,
}

#[derive(Subcommand)]
pub enum QuoteCommand {
    /// Submit the wishlist as a quote request.
    Submit(SubmitArgs),
    /// Resume a quote whose submission failed.
    Retry {
        /// Forget the pending quote instead of resending it.
        #[arg(long)]
        discard: bool,
    },
}

/// Quote form fields. Missing required values are prompted for.
#[derive(Args, Clone, Default)]
pub struct SubmitArgs {
    /// Contact name.
    #[arg(long)]
    pub name: Option<String>,

    /// Contact phone.
    #[arg(long)]
    pub phone: Option<String>,

    /// Contact email.
    #[arg(long)]
    pub email: Option<String>,

    /// Venue name.
    #[arg(long)]
    pub venue: Option<String>,

    /// Venue street address.
    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub postcode: Option<String>,

    /// Notes for the rental team.
    #[arg(long)]
    pub notes: Option<String>,

    /// Event start, as `YYYY-MM-DD H:MM AM|PM`.
    #[arg(long)]
    pub start: Option<String>,

    /// Event end, as `YYYY-MM-DD H:MM AM|PM`.
    #[arg(long)]
    pub end: Option<String>,

    /// Set title (defaults to the venue name).
    #[arg(long)]
    pub title: Option<String>,

    /// Never prompt; fail on missing fields.
    #[arg(long)]
    pub no_input: bool,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// API base URL to write.
        #[arg(long)]
        base_url: Option<String>,

        /// Write quote.json instead of quote.toml.
        #[arg(long = "as-json")]
        as_json: bool,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
