//! Wishlist commands.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use dialoguer::Confirm;
use rental_cache::Storage;
use rental_commerce::datetime::{combine, Period};
use rental_commerce::ids::ProductId;
use rental_commerce::wishlist::{Toggle, Wishlist, WishlistStore};

use super::{WishlistArgs, WishlistCommand};
use crate::context::Context;

const COLUMNS: [usize; 6] = [24, 28, 5, 10, 11, 10];

/// Run the wishlist command.
pub async fn run(args: WishlistArgs, ctx: &Context) -> Result<()> {
    let store = ctx.wishlist()?;

    match args.command.unwrap_or(WishlistCommand::Show) {
        WishlistCommand::Show => {
            show(&store.snapshot(), ctx);
            Ok(())
        }
        WishlistCommand::Add { id, quantity, date } => {
            add(&store, &id, quantity, date.as_deref(), ctx).await
        }
        WishlistCommand::Remove { id } => remove(&store, &id, ctx),
        WishlistCommand::Toggle { id } => toggle(&store, &id, ctx).await,
        WishlistCommand::Qty { id, quantity } => set_quantity(&store, &id, quantity, ctx),
        WishlistCommand::Date { id, date } => set_date(&store, &id, date.as_deref(), ctx),
        WishlistCommand::Clear { yes } => clear(&store, yes, ctx),
    }
}

/// Print the wishlist as a table with its total.
pub fn show(wishlist: &Wishlist, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": wishlist,
            "itemCount": wishlist.item_count(),
            "total": wishlist.total(),
        }));
        return;
    }

    ctx.output.header("Wishlist");
    if wishlist.is_empty() {
        ctx.output.info("Your wishlist is empty.");
        return;
    }

    ctx.output
        .table_row(&["ID", "TITLE", "QTY", "PER DAY", "LINE", "DATE"], &COLUMNS);
    for item in wishlist {
        let date = item
            .selected_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        ctx.output.table_row(
            &[
                item.product_id().as_str(),
                &item.product.title,
                &item.quantity.to_string(),
                &item.effective_price.display(),
                &item.total().display(),
                &date,
            ],
            &COLUMNS,
        );
    }

    ctx.output.info("");
    ctx.output.kv("items", &wishlist.item_count().to_string());
    ctx.output.kv("total", &wishlist.total().display());
}

async fn add<S: Storage>(
    store: &WishlistStore<S>,
    id: &str,
    quantity: u32,
    date: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    let id = ProductId::new(id);
    if store.contains(&id) {
        ctx.output
            .warn(&format!("{} is already in the wishlist; use `wishlist qty` to change it", id));
        return Ok(());
    }

    let selected_date = date.map(parse_date).transpose()?;
    let api = ctx.api()?;
    let product = api
        .product_details(&id)
        .await
        .with_context(|| format!("Failed to fetch product {}", id))?;

    let wishlist = store
        .add(&product, quantity, selected_date)
        .with_context(|| format!("Failed to add {}", product.title))?;

    ctx.output.success(&format!("Added {}", product.title));
    show(&wishlist, ctx);
    Ok(())
}

fn remove<S: Storage>(store: &WishlistStore<S>, id: &str, ctx: &Context) -> Result<()> {
    let id = ProductId::new(id);
    if !store.contains(&id) {
        ctx.output.info(&format!("{} is not in the wishlist", id));
        return Ok(());
    }

    let wishlist = store.remove(&id).context("Failed to update wishlist")?;
    ctx.output.success(&format!("Removed {}", id));
    show(&wishlist, ctx);
    Ok(())
}

async fn toggle<S: Storage>(store: &WishlistStore<S>, id: &str, ctx: &Context) -> Result<()> {
    let id = ProductId::new(id);

    // A product already listed toggles off without a catalog round-trip.
    let product = match store.snapshot().get(&id) {
        Some(item) => item.product.clone(),
        None => ctx
            .api()?
            .product_details(&id)
            .await
            .with_context(|| format!("Failed to fetch product {}", id))?,
    };

    let (wishlist, outcome) = store.toggle(&product).context("Failed to update wishlist")?;
    match outcome {
        Toggle::Added => ctx.output.success(&format!("Added {}", product.title)),
        Toggle::Removed => ctx.output.success(&format!("Removed {}", product.title)),
    }
    show(&wishlist, ctx);
    Ok(())
}

fn set_quantity<S: Storage>(
    store: &WishlistStore<S>,
    id: &str,
    quantity: u32,
    ctx: &Context,
) -> Result<()> {
    let id = ProductId::new(id);
    let wishlist = store
        .set_quantity(&id, quantity)
        .with_context(|| format!("Failed to change quantity of {}", id))?;
    ctx.output.success(&format!("Updated {}", id));
    show(&wishlist, ctx);
    Ok(())
}

fn set_date<S: Storage>(
    store: &WishlistStore<S>,
    id: &str,
    date: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    let id = ProductId::new(id);
    let date = date.map(parse_date).transpose()?;
    let wishlist = store
        .set_selected_date(&id, date)
        .with_context(|| format!("Failed to change date of {}", id))?;
    match date {
        Some(d) => ctx
            .output
            .success(&format!("{} booked for {}", id, d.format("%Y-%m-%d"))),
        None => ctx.output.success(&format!("Cleared date of {}", id)),
    }
    show(&wishlist, ctx);
    Ok(())
}

fn clear<S: Storage>(store: &WishlistStore<S>, yes: bool, ctx: &Context) -> Result<()> {
    let count = store.snapshot().len();
    if count == 0 {
        ctx.output.info("Your wishlist is already empty.");
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} item(s) from the wishlist?", count))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    store.clear().context("Failed to clear wishlist")?;
    ctx.output.success("Wishlist cleared");
    Ok(())
}

/// A booking date, read as midnight UTC.
fn parse_date(date: &str) -> Result<DateTime<Utc>> {
    combine(date, 12, 0, Period::Am).with_context(|| format!("Invalid date: {}", date))
}
