//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, render, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Validate => validate_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.source {
        Some(path) => ctx.output.kv("source", &path.display().to_string()),
        None => ctx.output.kv("source", "(defaults)"),
    }

    let config = &ctx.config;
    ctx.output.kv("base", if config.base.is_empty() { "/" } else { &config.base });
    ctx.output.kv("href", &config.href);
    ctx.output.kv("side_effect", &config.side_effect.to_string());
    let navigation = match config.handle_navigation.scope() {
        Some(scope) => format!("within {:?}", scope),
        None => config.handle_navigation.is_enabled().to_string(),
    };
    ctx.output.kv("handle_navigation", &navigation);
    ctx.output.kv("delay_ms", &config.delay_ms.to_string());
    ctx.output.kv("auto_clear_params", &config.auto_clear_params.to_string());

    for (label, options) in [("query", &config.query), ("fragment", &config.fragment)] {
        ctx.output.info("");
        ctx.output.info(&format!("[{}]", label));
        ctx.output.kv("parse", &options.parse.to_string());
        ctx.output.kv("typed", &options.typed.to_string());
        ctx.output.kv("clean", &options.clean.to_string());
        ctx.output.kv("short_boolean", &options.short_boolean.to_string());
    }

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    ctx.config.validate().context("Configuration is invalid")?;

    let mut warnings: Vec<String> = Vec::new();
    if ctx.config.delay_ms > 0 && ctx.config.delay_ms <= 200 {
        warnings.push(format!(
            "delay_ms = {} is at or below 200, history writes stay immediate",
            ctx.config.delay_ms
        ));
    }
    if !ctx.config.query.parse && !ctx.config.fragment.parse {
        warnings.push("query and fragment parsing are both off".to_string());
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
    } else {
        ctx.output.success("Configuration is valid (with warnings)");
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    // an explicit --base or loaded config is kept; otherwise write the template
    let content = if ctx.source.is_some() || !ctx.config.base.is_empty() {
        render(&ctx.config, &config_path)?
    } else {
        generate_default_config("")
    };

    tracing::debug!(path = %config_path.display(), force, "writing config file");
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
