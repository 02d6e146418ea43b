//! RPC method handler for the TrackerLens JSON protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` decodes the parameters of a method call, forwards it to
//! the monitor task through a [`MonitorHandle`] and encodes the reply.

use std::time::Instant;

use serde::Serialize;
use serde_json::{json, Value};

use crate::app::now_millis;
use crate::event_loop::MonitorHandle;
use crate::types::event::{ObservationEvent, TabId, TabLifecycleEvent};

/// Methods carrying observations from the page. They must all reach the
/// monitor, so they bypass the rate limit.
pub const FEED_METHODS: [&str; 3] = ["event.ingest", "tab.navigated", "tab.closed"];

/// Per-second limit on view and settings calls.
pub struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    pub fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
    }

    /// Returns true if a call to `method` may proceed. Feed methods are
    /// always admitted and do not use up the budget.
    pub fn admit(&mut self, method: &str) -> bool {
        if FEED_METHODS.contains(&method) {
            return true;
        }
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count = self.request_count.saturating_add(1);
        self.request_count <= self.max_per_second
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn tab_id_param(params: &Value) -> Result<TabId, String> {
    params
        .get("tab_id")
        .and_then(Value::as_i64)
        .map(TabId)
        .ok_or_else(|| "missing tab_id".to_string())
}

/// `now` is optional on view methods so tests can pin the clock.
fn now_param(params: &Value) -> i64 {
    params.get("now").and_then(Value::as_i64).unwrap_or_else(now_millis)
}

/// Dispatch a JSON method call to the monitor.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(handle: &MonitorHandle, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => {
            let settings = handle.settings().await.map_err(|e| e.to_string())?;
            Ok(json!({
                "pong": true,
                "version": env!("CARGO_PKG_VERSION"),
                "poll_interval_ms": settings.display.poll_interval_ms,
            }))
        }

        // ─── Event feed ───
        "event.ingest" => {
            let event: ObservationEvent =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid event: {}", e))?;
            let outcome = handle.ingest(event).await.map_err(|e| e.to_string())?;
            Ok(json!({"outcome": outcome.as_str()}))
        }

        // ─── Tab lifecycle ───
        "tab.navigated" => {
            let tab_id = tab_id_param(params)?;
            let url = params.get("url").and_then(Value::as_str).ok_or("missing url")?;
            let removed = handle
                .lifecycle(TabLifecycleEvent::NavigationStarted {
                    tab_id,
                    url: url.to_string(),
                })
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"removed": removed}))
        }
        "tab.closed" => {
            let tab_id = tab_id_param(params)?;
            let removed = handle
                .lifecycle(TabLifecycleEvent::Closed { tab_id })
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"removed": removed}))
        }

        // ─── Views ───
        "popup.summary" => {
            let tab_id = tab_id_param(params)?;
            let url = params.get("url").and_then(Value::as_str).map(str::to_string);
            let summary = handle
                .popup_summary(tab_id, url, now_param(params))
                .await
                .map_err(|e| e.to_string())?;
            to_json(&summary)
        }
        "histogram.get" => {
            let tab_id = tab_id_param(params)?;
            let histogram = handle
                .histogram(tab_id, now_param(params))
                .await
                .map_err(|e| e.to_string())?;
            to_json(&histogram)
        }
        "report.get" => {
            let report = handle.report().await.map_err(|e| e.to_string())?;
            to_json(&report)
        }
        "tab.log" => {
            let tab_id = tab_id_param(params)?;
            let log = handle.tab_log(tab_id).await.map_err(|e| e.to_string())?;
            to_json(&log)
        }

        // ─── Clear data ───
        "data.clear_tab" => {
            let tab_id = tab_id_param(params)?;
            let removed = handle.clear_tab(tab_id).await.map_err(|e| e.to_string())?;
            Ok(json!({"removed": removed}))
        }
        "data.clear_all" => {
            handle.clear_all().await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let settings = handle.settings().await.map_err(|e| e.to_string())?;
            to_json(&settings)
        }
        "settings.set" => {
            let key = params.get("key").and_then(Value::as_str).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let settings = handle
                .set_setting(key, value)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&settings)
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
