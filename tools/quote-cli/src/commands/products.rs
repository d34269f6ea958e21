//! Catalog browsing commands.

use anyhow::{anyhow, Context as _, Result};
use rental_commerce::catalog::{base_price, effective_price, Product};
use rental_commerce::ids::ProductId;
use rental_commerce::money::Money;
use rental_commerce::search::{ProductFilter, ProductPage, SortOption, DEFAULT_WINDOW_SIZE};

use super::{ListArgs, ProductsArgs, ProductsCommand};
use crate::context::Context;

const COLUMNS: [usize; 4] = [24, 28, 12, 12];

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProductsCommand::List(list) => list_products(list, false, ctx).await,
        ProductsCommand::Discounted(list) => list_products(list, true, ctx).await,
        ProductsCommand::Show { id } => show_product(&id, ctx).await,
    }
}

async fn list_products(args: ListArgs, discounted: bool, ctx: &Context) -> Result<()> {
    let filter = build_filter(&args)?;
    let api = ctx.api()?;

    let spinner = ctx.output.spinner("Fetching products...");
    let result = if discounted {
        api.discounted_products(&filter).await
    } else {
        api.all_products(&filter).await
    };
    spinner.finish_and_clear();
    let page = result.context("Failed to fetch products")?;

    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }

    print_page(&page, args.page, discounted, ctx);
    Ok(())
}

fn print_page(page: &ProductPage, requested: u32, discounted: bool, ctx: &Context) {
    let pagination = page.pagination(requested);
    let title = if discounted { "Discounted Products" } else { "Products" };
    ctx.output.header(&match pagination.total_items {
        Some(total) => format!("{} ({} total)", title, total),
        None => title.to_string(),
    });

    if page.is_empty() {
        ctx.output.info("No products match.");
        return;
    }

    ctx.output
        .table_row(&["ID", "TITLE", "PER DAY", "WAS"], &COLUMNS);
    for product in &page.products {
        let (price, was) = price_columns(product);
        ctx.output.table_row(
            &[product.id.as_str(), &product.title, &price, &was],
            &COLUMNS,
        );
    }

    ctx.output
        .pager(&pagination.window(DEFAULT_WINDOW_SIZE), pagination.page);
    if let Some(next) = pagination.next_page() {
        ctx.output.info(&format!("Next page: --page {}", next));
    }
}

/// Effective price, and the base price when a promotion lowers it.
fn price_columns(product: &Product) -> (String, String) {
    match (effective_price(product), base_price(product)) {
        (Ok(effective), Ok(base)) if effective != base => {
            (effective.display(), base.display())
        }
        (Ok(effective), _) => (effective.display(), String::new()),
        (Err(_), _) => ("n/a".to_string(), String::new()),
    }
}

async fn show_product(id: &str, ctx: &Context) -> Result<()> {
    let id = ProductId::new(id);
    let api = ctx.api()?;

    let spinner = ctx.output.spinner("Fetching product...");
    let result = api.product_details(&id).await;
    spinner.finish_and_clear();
    let product = result.with_context(|| format!("Failed to fetch product {}", id))?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.title);
    ctx.output.kv("id", product.id.as_str());
    if let Some(category) = product.category_name() {
        ctx.output.kv("category", category);
    }

    let (price, was) = price_columns(&product);
    ctx.output.kv("per day", &price);
    if !was.is_empty() {
        ctx.output.kv("was", &was);
    }
    if let Some(promotion) = product.promotion.as_ref().filter(|p| p.active) {
        let amount = promotion
            .value
            .as_ref()
            .and_then(|v| v.value())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string());
        ctx.output
            .kv("promotion", &format!("{} {}", promotion.kind.as_str(), amount));
    }

    for (name, value) in [
        ("height", &product.height),
        ("length", &product.length),
        ("width", &product.width),
        ("shape", &product.shape),
    ] {
        if let Some(value) = value {
            ctx.output.kv(name, &dimension(value));
        }
    }
    if let Some(image) = product.cover_image() {
        ctx.output.kv("image", image);
    }
    if let Some(description) = product.description.as_deref() {
        ctx.output.info("");
        ctx.output.info(description);
    }

    Ok(())
}

fn dimension(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn build_filter(args: &ListArgs) -> Result<ProductFilter> {
    let mut filter = ProductFilter::new().page(args.page.max(1));

    if let Some(search) = args.search.as_deref().filter(|s| !s.trim().is_empty()) {
        filter = filter.search(search.trim());
    }
    if let Some(category) = args.category.as_deref().filter(|s| !s.trim().is_empty()) {
        filter = filter.category(category.trim());
    }
    if let Some(sort) = args.sort.as_deref() {
        let sort: SortOption = sort.parse().map_err(|e: String| anyhow!(e))?;
        filter = filter.sort(sort);
    }
    if let Some(limit) = args.limit {
        filter = filter.limit(limit);
    }

    let min = args.min_price.map(to_money).transpose()?;
    let max = args.max_price.map(to_money).transpose()?;
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(anyhow!("--min-price {} is above --max-price {}", min, max));
        }
    }
    if min.is_some() || max.is_some() {
        filter = filter.price_range(min, max);
    }

    Ok(filter)
}

fn to_money(amount: f64) -> Result<Money> {
    Money::from_decimal(amount)
        .filter(|m| !m.is_negative())
        .ok_or_else(|| anyhow!("invalid price: {}", amount))
}
