//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, QuoteConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init {
            base_url,
            as_json,
            force,
        } => init_config(base_url, as_json, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output
        .kv("request_timeout_ms", &ctx.config.api.request_timeout_ms.to_string());
    ctx.output
        .kv("max_retries", &ctx.config.api.max_retries.to_string());

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output
        .kv("dir", &ctx.storage_dir().display().to_string());
    ctx.output.kv("wishlist_key", &ctx.config.storage.wishlist_key);

    ctx.output.info("");
    ctx.output.info("[quote]");
    ctx.output.kv(
        "submit_timeout_secs",
        &ctx.config.quote.submit_timeout_secs.to_string(),
    );

    Ok(())
}

fn init_config(base_url: Option<String>, as_json: bool, force: bool, ctx: &Context) -> Result<()> {
    let name = if as_json { "quote.json" } else { "quote.toml" };
    let config_path = ctx.cwd.join(name);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let path = config_path.to_string_lossy();
    if as_json {
        let mut config = QuoteConfig::default();
        if let Some(url) = base_url {
            config.api.base_url = url;
        }
        config.save(&path)?;
    } else {
        let url = base_url.unwrap_or_else(|| QuoteConfig::default().api.base_url);
        std::fs::write(config_path.as_path(), generate_default_config(&url))?;
    }

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.check();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "valid": errors.is_empty(),
            "errors": errors,
            "warnings": warnings,
        }));
        if !errors.is_empty() {
            bail!("Configuration has {} error(s)", errors.len());
        }
        return Ok(());
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
