//! Parse a URL into a route.

use anyhow::Result;
use routesync_core::RouteParser;

use super::ParseArgs;
use crate::context::Context;
use crate::output::path_label;

/// Run the parse command.
pub fn run(args: ParseArgs, ctx: &Context) -> Result<()> {
    let parser = RouteParser::new(&ctx.config);
    let route = parser.parse(&args.url);
    let serialized = parser.serialize(&route);
    let href = parser.href(&route);
    tracing::debug!(url = %args.url, path = %route.path, %href, "parsed url");

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "input": args.url,
            "route": route,
            "serialized": serialized,
            "href": href,
            "outside_base": route.is_outside_base(),
        }));
        return Ok(());
    }

    ctx.output.header("Route");
    ctx.output.kv("base", parser.base());
    ctx.output.kv("path", &path_label(&route.path));
    ctx.output.params("query", &route.query);
    ctx.output.params("fragment", &route.fragment);
    ctx.output.kv("serialized", &serialized);
    ctx.output.kv("href", &href);

    if route.is_outside_base() {
        ctx.output.warn(&format!("{} is outside base {}", args.url, parser.base()));
    }

    Ok(())
}
