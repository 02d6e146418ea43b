//! TrackerLens RPC Server — JSON methods over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"event.ingest", "params":{"type":"NETWORK_REQUEST", ...}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr, filtered by `TRACKERLENS_LOG` (default `info`).

use std::path::PathBuf;

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trackerlens::app::App;
use trackerlens::event_loop::spawn_monitor;
use trackerlens::platform;
use trackerlens::rpc_handler::{handle_method, RateLimiter};

/// Limit on view and settings calls; the event feed is never throttled.
const VIEW_REQUESTS_PER_SECOND: u32 = 200;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("TRACKERLENS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .init();
}

/// Database location: `TRACKERLENS_DATA_DIR` if set, otherwise the platform data directory.
fn db_path() -> PathBuf {
    let dir = match std::env::var("TRACKERLENS_DATA_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => platform::get_data_dir(),
    };
    dir.join("trackerlens.db")
}

async fn write_line(stdout: &mut io::Stdout, value: &Value) -> io::Result<()> {
    stdout.write_all(value.to_string().as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let db_path = db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let app = App::new(&db_path, None).map_err(|e| {
        error!(error = %e, path = %db_path.display(), "failed to open state store");
        e
    })?;
    info!(path = %db_path.display(), "state store opened");
    let handle = spawn_monitor(app);

    let mut stdout = io::stdout();
    write_line(&mut stdout, &json!({"event":"ready","version":env!("CARGO_PKG_VERSION")})).await?;

    let mut rate_limiter = RateLimiter::new(VIEW_REQUESTS_PER_SECOND);

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "unparseable request line");
                write_line(&mut stdout, &json!({"id":null,"error":format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(Value::as_str).unwrap_or("");

        if !rate_limiter.admit(method) {
            warn!(method, "rate limit exceeded");
            write_line(&mut stdout, &json!({"id": id, "error": "rate limit exceeded"})).await?;
            continue;
        }

        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&handle, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        write_line(&mut stdout, &response).await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
