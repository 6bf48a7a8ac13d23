//! Replay navigations against an in-memory history.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};
use routesync_core::{is_absolute_url, StoreConfig};
use routesync_store::{ManualTimer, MemoryHistory, RouteStore};
use serde::Serialize;

use super::SimulateArgs;
use crate::context::Context;
use crate::output::path_label;

/// What a simulated session produced.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub start: String,
    pub final_path: String,
    pub final_href: String,
    pub notifications: usize,
    pub writes: Vec<String>,
}

/// Run the simulate command.
pub fn run(args: SimulateArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(delay) = args.delay {
        config.delay_ms = delay;
    }
    if !config.side_effect {
        ctx.output.warn("side_effect is off; no history writes will happen");
    }

    let start = args.start.clone().unwrap_or_else(|| config.href.clone());
    if !is_absolute_url(&start) {
        bail!("Start location must be an absolute URL: {}", start);
    }

    let total = args.urls.len();
    let interval = Duration::from_millis(args.interval);
    let report = simulate(config, &start, &args.urls, interval, |i, url| {
        ctx.output.step(i + 1, total, &format!("set {}", url));
    });

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.header("Simulation");
    ctx.output.kv("start", &report.start);
    ctx.output.kv("final path", &path_label(&report.final_path));
    ctx.output.kv("final href", &report.final_href);
    ctx.output.kv("notifications", &report.notifications.to_string());

    if report.writes.is_empty() {
        ctx.output.info("No history writes");
    } else {
        ctx.output.info(&format!("{} history write(s):", report.writes.len()));
        for write in &report.writes {
            ctx.output.list_item(write);
        }
    }

    Ok(())
}

/// Apply `urls` to a store over a fresh history, letting `interval` pass
/// after each one, then flush pending writes.
pub fn simulate(
    config: StoreConfig,
    start: &str,
    urls: &[String],
    interval: Duration,
    mut on_step: impl FnMut(usize, &str),
) -> SimulationReport {
    let history = MemoryHistory::new(start);
    let timer = ManualTimer::new();
    let store = RouteStore::builder(config)
        .history(history.clone())
        .timer(timer.clone())
        .build();

    let notifications = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&notifications);
    let subscription = store.subscribe(move |_| counter.set(counter.get() + 1));

    tracing::debug!(%start, steps = urls.len(), ?interval, "simulation started");
    for (i, url) in urls.iter().enumerate() {
        tracing::trace!(step = i, %url, "simulated set");
        on_step(i, url);
        store.set(url);
        timer.advance(interval);
    }
    timer.run_all();
    subscription.unsubscribe();

    let route = store.get();
    tracing::debug!(
        final_path = %route.path,
        writes = history.entries().len().saturating_sub(1),
        "simulation finished"
    );
    SimulationReport {
        start: history.entries().first().cloned().unwrap_or_default(),
        final_path: route.path,
        final_href: store.href(),
        // the first delivery is the initial value, not a change
        notifications: notifications.get().saturating_sub(1),
        writes: history.entries().into_iter().skip(1).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_debounced_session_writes_once() {
        let config = StoreConfig::new().with_delay_ms(300);
        let report = simulate(
            config,
            "https://x.test/",
            &urls(&["/a", "/b", "/c"]),
            Duration::from_millis(100),
            |_, _| {},
        );

        assert_eq!(report.writes, vec!["https://x.test/c"]);
        assert_eq!(report.final_path, "/c");
        assert_eq!(report.notifications, 3);
    }

    #[test]
    fn test_immediate_session_writes_each() {
        let config = StoreConfig::new().with_base("/app");
        let mut steps = Vec::new();
        let report = simulate(
            config,
            "https://x.test/app/",
            &urls(&["users", "users?page=2"]),
            Duration::ZERO,
            |i, url| steps.push((i, url.to_string())),
        );

        assert_eq!(
            report.writes,
            vec!["https://x.test/app/users", "https://x.test/app/users?page=2"]
        );
        assert_eq!(report.final_href, "/app/users?page=2");
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_side_effect_off_writes_nothing() {
        let config = StoreConfig::new().with_side_effect(false);
        let report = simulate(config, "https://x.test/", &urls(&["/a"]), Duration::ZERO, |_, _| {});
        assert!(report.writes.is_empty());
        assert_eq!(report.final_path, "/a");
    }

    #[test]
    fn test_start_location_must_be_absolute() {
        assert!(is_absolute_url("https://x.test/"));
        assert!(!is_absolute_url("/a"));
        assert!(!is_absolute_url("x.test:8080/a"));
    }
}
