//! Single-writer monitor task.
//!
//! The [`App`] is moved onto a dedicated blocking task that drains a command
//! channel one message at a time, so every read-modify-write cycle against
//! the store completes before the next one starts. Callers talk to it through
//! a cloneable [`MonitorHandle`]; each request carries a oneshot reply.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::app::App;
use crate::managers::event_ingestor::IngestOutcome;
use crate::types::errors::MonitorError;
use crate::types::event::{ObservationEvent, TabId, TabLifecycleEvent};
use crate::types::log::PerTabLog;
use crate::types::settings::MonitorSettings;
use crate::types::stats::GlobalStats;
use crate::types::view::{Histogram, PopupSummary, ReportSummary};

/// Capacity of the command channel.
pub const COMMAND_CHANNEL_CAPACITY: usize = 256;

type Reply<T> = oneshot::Sender<Result<T, MonitorError>>;

enum Command {
    Ingest {
        event: ObservationEvent,
        reply: Reply<IngestOutcome>,
    },
    Lifecycle {
        event: TabLifecycleEvent,
        reply: Reply<usize>,
    },
    TabLog {
        tab_id: TabId,
        reply: Reply<PerTabLog>,
    },
    PopupSummary {
        tab_id: TabId,
        current_url: Option<String>,
        now: i64,
        reply: Reply<PopupSummary>,
    },
    Histogram {
        tab_id: TabId,
        now: i64,
        reply: Reply<Histogram>,
    },
    Report {
        reply: Reply<ReportSummary>,
    },
    GlobalStats {
        reply: Reply<GlobalStats>,
    },
    ClearTab {
        tab_id: TabId,
        reply: Reply<usize>,
    },
    ClearAll {
        reply: Reply<()>,
    },
    Settings {
        reply: Reply<MonitorSettings>,
    },
    SetSetting {
        key: String,
        value: Value,
        reply: Reply<MonitorSettings>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Ingest { .. } => "ingest",
            Command::Lifecycle { .. } => "lifecycle",
            Command::TabLog { .. } => "tab_log",
            Command::PopupSummary { .. } => "popup_summary",
            Command::Histogram { .. } => "histogram",
            Command::Report { .. } => "report",
            Command::GlobalStats { .. } => "global_stats",
            Command::ClearTab { .. } => "clear_tab",
            Command::ClearAll { .. } => "clear_all",
            Command::Settings { .. } => "settings",
            Command::SetSetting { .. } => "set_setting",
        }
    }
}

/// Runs one command against the app and sends the reply. A caller that
/// stopped waiting is not an error.
fn dispatch(app: &mut App, command: Command) {
    debug!(command = command.name(), "monitor command");
    match command {
        Command::Ingest { event, reply } => {
            let _ = reply.send(app.ingest(&event));
        }
        Command::Lifecycle { event, reply } => {
            let _ = reply.send(app.handle_lifecycle(&event));
        }
        Command::TabLog { tab_id, reply } => {
            let _ = reply.send(app.tab_log(tab_id));
        }
        Command::PopupSummary {
            tab_id,
            current_url,
            now,
            reply,
        } => {
            let _ = reply.send(app.popup_summary(tab_id, current_url.as_deref(), now));
        }
        Command::Histogram { tab_id, now, reply } => {
            let _ = reply.send(app.histogram(tab_id, now));
        }
        Command::Report { reply } => {
            let _ = reply.send(app.report());
        }
        Command::GlobalStats { reply } => {
            let _ = reply.send(app.global_stats());
        }
        Command::ClearTab { tab_id, reply } => {
            let _ = reply.send(app.clear_tab(tab_id));
        }
        Command::ClearAll { reply } => {
            let _ = reply.send(app.clear_all());
        }
        Command::Settings { reply } => {
            let _ = reply.send(Ok(app.settings().clone()));
        }
        Command::SetSetting { key, value, reply } => {
            let result = app.set_setting(&key, value).map(|()| app.settings().clone());
            let _ = reply.send(result);
        }
    }
}

/// Moves `app` onto the monitor task and returns a handle to it.
///
/// The task ends once every handle has been dropped.
pub fn spawn_monitor(mut app: App) -> MonitorHandle {
    let (tx, mut rx) = mpsc::channel::<Command>(COMMAND_CHANNEL_CAPACITY);
    tokio::task::spawn_blocking(move || {
        info!("monitor task started");
        while let Some(command) = rx.blocking_recv() {
            dispatch(&mut app, command);
        }
        info!("monitor task stopped");
    });
    MonitorHandle { tx }
}

/// Cloneable handle to the monitor task.
#[derive(Clone)]
pub struct MonitorHandle {
    tx: mpsc::Sender<Command>,
}

impl MonitorHandle {
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, MonitorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| MonitorError::ChannelClosed)?;
        rx.await.map_err(|_| MonitorError::ReplyDropped)?
    }

    pub async fn ingest(&self, event: ObservationEvent) -> Result<IngestOutcome, MonitorError> {
        self.request(|reply| Command::Ingest { event, reply }).await
    }

    pub async fn lifecycle(&self, event: TabLifecycleEvent) -> Result<usize, MonitorError> {
        self.request(|reply| Command::Lifecycle { event, reply }).await
    }

    pub async fn tab_log(&self, tab_id: TabId) -> Result<PerTabLog, MonitorError> {
        self.request(|reply| Command::TabLog { tab_id, reply }).await
    }

    pub async fn popup_summary(
        &self,
        tab_id: TabId,
        current_url: Option<String>,
        now: i64,
    ) -> Result<PopupSummary, MonitorError> {
        self.request(|reply| Command::PopupSummary {
            tab_id,
            current_url,
            now,
            reply,
        })
        .await
    }

    pub async fn histogram(&self, tab_id: TabId, now: i64) -> Result<Histogram, MonitorError> {
        self.request(|reply| Command::Histogram { tab_id, now, reply })
            .await
    }

    pub async fn report(&self) -> Result<ReportSummary, MonitorError> {
        self.request(|reply| Command::Report { reply }).await
    }

    pub async fn global_stats(&self) -> Result<GlobalStats, MonitorError> {
        self.request(|reply| Command::GlobalStats { reply }).await
    }

    pub async fn clear_tab(&self, tab_id: TabId) -> Result<usize, MonitorError> {
        self.request(|reply| Command::ClearTab { tab_id, reply }).await
    }

    pub async fn clear_all(&self) -> Result<(), MonitorError> {
        self.request(|reply| Command::ClearAll { reply }).await
    }

    pub async fn settings(&self) -> Result<MonitorSettings, MonitorError> {
        self.request(|reply| Command::Settings { reply }).await
    }

    /// Updates one setting by dot path; returns the settings after the change.
    pub async fn set_setting(&self, key: &str, value: Value) -> Result<MonitorSettings, MonitorError> {
        let key = key.to_string();
        self.request(|reply| Command::SetSetting { key, value, reply })
            .await
    }
}
