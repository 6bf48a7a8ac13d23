//! Normalize paths.

use anyhow::Result;
use routesync_core::normalize;

use super::NormalizeArgs;
use crate::context::Context;

/// Run the normalize command.
pub fn run(args: NormalizeArgs, ctx: &Context) -> Result<()> {
    let results: Vec<(String, String)> = args
        .paths
        .into_iter()
        .map(|path| {
            let normalized = normalize(&path);
            tracing::trace!(input = %path, %normalized, "normalized path");
            (path, normalized)
        })
        .collect();

    if ctx.output.is_json() {
        let entries: Vec<_> = results
            .iter()
            .map(|(input, path)| serde_json::json!({ "input": input, "path": path }))
            .collect();
        ctx.output.json(&entries);
        return Ok(());
    }

    for (input, path) in &results {
        ctx.output.list_item(&format!("{:?} -> {}", input, path));
    }

    Ok(())
}
