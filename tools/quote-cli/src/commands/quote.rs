//! Quote submission commands.

use anyhow::{anyhow, bail, Context as _, Result};
use dialoguer::{Confirm, Input};
use rental_cache::{Cache, Storage};
use rental_commerce::datetime::TimeFields;
use rental_commerce::quote::{BuyerInfo, QuoteBuilder, QuotePayload, QuoteSubmission, VenueInfo};
use rental_commerce::wishlist::WishlistStore;
use rental_commerce::CommerceError;

use super::{QuoteArgs, QuoteCommand, SubmitArgs};
use crate::context::Context;

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    match args.command {
        QuoteCommand::Submit(submit) => submit_quote(submit, ctx).await,
        QuoteCommand::Retry { discard } => retry_quote(discard, ctx).await,
    }
}

async fn submit_quote(args: SubmitArgs, ctx: &Context) -> Result<()> {
    let store = ctx.wishlist()?;
    let cache = ctx.pending_cache()?;

    if let Some(pending) = QuoteSubmission::load_pending(&cache)? {
        bail!(
            "Quote {} is still pending; run `quote retry` to resend it or `quote retry --discard` to drop it",
            pending.set_code()
        );
    }

    let wishlist = store.snapshot();
    if wishlist.is_empty() {
        bail!("Your wishlist is empty; add products with `quote wishlist add <id>`");
    }

    ctx.output.header("Request a Quote");

    // Step 1: Collect the form
    let prompt = !(args.no_input || ctx.output.is_json());
    let form = QuoteForm::collect(&args, prompt)?;

    let mut builder = QuoteBuilder::new();
    if let Some(title) = args.title.as_deref().filter(|t| !t.trim().is_empty()) {
        builder = builder.with_set_title(title.trim());
    }
    builder
        .validate(&wishlist, &form.buyer, &form.venue, &form.start, &form.end)
        .map_err(form_error)?;

    // Step 2: Tax rate
    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Fetching tax rate...");
    let tax = api.tax_value().await;
    spinner.finish_and_clear();
    let tax = tax.context("Failed to fetch the tax rate")?;

    // Step 3: Build and confirm
    let payload = builder
        .build(&wishlist, &form.buyer, &form.venue, &form.start, &form.end, tax)
        .map_err(form_error)?;

    print_summary(&payload, tax, ctx);

    if !args.yes && prompt {
        ctx.output.info("");
        let confirmed = Confirm::new()
            .with_prompt("Send this quote request?")
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Quote request cancelled");
            return Ok(());
        }
    }

    // Step 4: Submit
    let submission = QuoteSubmission::new(payload);
    send(submission, &api, &store, &cache, ctx).await
}

async fn retry_quote(discard: bool, ctx: &Context) -> Result<()> {
    let cache = ctx.pending_cache()?;
    let Some(submission) = QuoteSubmission::load_pending(&cache)? else {
        ctx.output.info("No pending quote.");
        return Ok(());
    };

    if discard {
        QuoteSubmission::discard_pending(&cache)?;
        ctx.output
            .success(&format!("Dropped pending quote {}", submission.set_code()));
        return Ok(());
    }

    ctx.output
        .header(&format!("Resending quote {}", submission.set_code()));
    if let Some(leg) = submission.pending_leg() {
        ctx.output.kv("resuming at", leg.as_str());
    }

    let store = ctx.wishlist()?;
    let api = ctx.api()?;
    send(submission, &api, &store, &cache, ctx).await
}

/// Run the remaining legs, parking the submission if any leg fails.
async fn send<S: Storage>(
    mut submission: QuoteSubmission,
    api: &rental_api::StorefrontApi,
    store: &WishlistStore<S>,
    cache: &Cache<S>,
    ctx: &Context,
) -> Result<()> {
    let deadline = ctx.config.quote.submit_timeout();
    let spinner = ctx.output.spinner("Sending quote request...");
    let result = submission.submit(api, store, deadline).await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            if let Err(e) = QuoteSubmission::discard_pending(cache) {
                tracing::warn!(error = %e, "could not remove pending quote");
            }

            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "setCode": outcome.set_code,
                    "totalPrice": outcome.total_price,
                    "wishlistCleared": outcome.wishlist_cleared,
                }));
                return Ok(());
            }

            ctx.output.success(&format!(
                "Quote {} sent ({})",
                outcome.set_code, outcome.total_price
            ));
            if !outcome.wishlist_cleared {
                ctx.output
                    .warn("The quote was delivered but the wishlist could not be cleared");
            }
            Ok(())
        }
        Err(e) => {
            submission
                .save_pending(cache)
                .context("Quote failed and could not be saved for retry")?;
            if submission.payment_saved() {
                ctx.output
                    .warn("The quote was recorded but the confirmation step failed");
            }
            ctx.output
                .info("Run `quote retry` to resume from the failed step.");
            Err(anyhow!(e).context(format!("Quote {} not sent", submission.set_code())))
        }
    }
}

fn print_summary(payload: &QuotePayload, tax: f64, ctx: &Context) {
    if ctx.output.is_json() {
        return;
    }

    ctx.output.info("");
    ctx.output.kv("contact", &format!(
        "{} <{}> {}",
        payload.buyer.name, payload.buyer.email, payload.buyer.phone
    ));
    ctx.output.kv("venue", &payload.venue.one_line());
    ctx.output
        .kv("start", &payload.start_date.format("%Y-%m-%d %I:%M %p").to_string());
    ctx.output
        .kv("end", &payload.end_date.format("%Y-%m-%d %I:%M %p").to_string());
    if let Some(set) = payload.primary_set() {
        ctx.output.kv("set", &format!("{} ({})", set.set_title, set.set_code));
    }

    ctx.output.info("");
    for product in payload.products() {
        ctx.output.list_item(&format!(
            "{} × {} @ {} = {}",
            product.quantity, product.product.title, product.effective_price, product.product_total
        ));
    }
    ctx.output.info("");
    ctx.output.kv("tax rate", &format!("{}%", tax));
    ctx.output.kv("total", &payload.total_price.display());
}

/// Raw quote form values.
struct QuoteForm {
    buyer: BuyerInfo,
    venue: VenueInfo,
    start: TimeFields,
    end: TimeFields,
}

impl QuoteForm {
    fn collect(args: &SubmitArgs, prompt: bool) -> Result<Self> {
        let field = |value: &Option<String>, label: &str, required: bool| -> Result<String> {
            match value {
                Some(v) => Ok(v.clone()),
                None if prompt => ask(label, required),
                None => Ok(String::new()),
            }
        };

        let buyer = BuyerInfo::new(
            field(&args.name, "Name", true)?,
            field(&args.phone, "Phone", true)?,
            field(&args.email, "Email", true)?,
        );
        let venue = VenueInfo::new(field(&args.venue, "Venue name", true)?)
            .with_address(
                field(&args.address, "Venue address", false)?,
                field(&args.city, "City", false)?,
                field(&args.state, "State", false)?,
                field(&args.postcode, "Postcode", false)?,
            )
            .with_notes(field(&args.notes, "Notes", false)?);

        let start = field(&args.start, "Start (YYYY-MM-DD H:MM AM|PM)", true)?;
        let end = field(&args.end, "End (YYYY-MM-DD H:MM AM|PM)", true)?;

        Ok(Self {
            buyer,
            venue,
            start: parse_when(&start).context("Invalid start")?,
            end: parse_when(&end).context("Invalid end")?,
        })
    }
}

fn ask(label: &str, required: bool) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(label)
        .allow_empty(!required)
        .interact_text()?)
}

/// Split `YYYY-MM-DD H:MM AM` into form fields. `4PM` and `4:30 pm` work too.
fn parse_when(input: &str) -> Result<TimeFields> {
    let input = input.trim();
    if input.is_empty() {
        bail!("a date and time are required");
    }
    let (date, clock) = input
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("expected `YYYY-MM-DD H:MM AM|PM`, got '{}'", input))?;

    let clock: String = clock.chars().filter(|c| !c.is_whitespace()).collect();
    let split = clock.len().saturating_sub(2);
    if !clock.is_char_boundary(split) {
        bail!("missing AM/PM in '{}'", input);
    }
    let (time, period) = clock.split_at(split);
    if !period.chars().all(|c| c.is_ascii_alphabetic()) || period.len() != 2 {
        bail!("missing AM/PM in '{}'", input);
    }
    let (hour, minute) = time.split_once(':').unwrap_or((time, "00"));

    Ok(TimeFields::new(date, hour, minute, period))
}

/// Name the offending form field in validation errors.
fn form_error(e: CommerceError) -> anyhow::Error {
    match e.field() {
        Some(field) => anyhow!(e).context(format!("Please check the {} field", field)),
        None => anyhow!(e),
    }
}
