//! Match a URL against route patterns.

use anyhow::Result;
use routesync_core::{Matcher, RouteParser};

use super::MatchArgs;
use crate::context::Context;
use crate::output::path_label;

/// Run the match command.
pub fn run(args: MatchArgs, ctx: &Context) -> Result<()> {
    let parser = RouteParser::new(&ctx.config);
    let matcher = Matcher::new(&ctx.config.base);
    let route = parser.parse(&args.url);
    tracing::debug!(
        path = %route.path,
        patterns = args.patterns.len(),
        loose = args.loose,
        "matching route"
    );

    let hit = matcher.first_match(
        &route,
        args.patterns.iter().map(String::as_str),
        args.loose,
    );
    match &hit {
        Some((index, _)) => {
            tracing::debug!(pattern = %args.patterns[*index], index, "pattern matched")
        }
        None => tracing::debug!("no pattern matched"),
    }

    if ctx.output.is_json() {
        let value = match &hit {
            Some((index, params)) => serde_json::json!({
                "path": route.path,
                "matched": true,
                "pattern": args.patterns[*index],
                "index": index,
                "params": params,
            }),
            None => serde_json::json!({
                "path": route.path,
                "matched": false,
            }),
        };
        ctx.output.json(&value);
        return Ok(());
    }

    ctx.output.kv("path", &path_label(&route.path));
    ctx.output.kv("mode", if args.loose { "loose" } else { "strict" });

    match hit {
        Some((index, params)) => {
            ctx.output.success(&format!("Matched {}", args.patterns[index]));
            for (key, value) in &params {
                ctx.output.kv(key, value.as_deref().unwrap_or("(absent)"));
            }
        }
        None => ctx.output.warn("No pattern matched"),
    }

    Ok(())
}
