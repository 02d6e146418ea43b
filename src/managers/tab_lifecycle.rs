//! Tab lifecycle reconciliation.
//!
//! A tab that navigates to a new page or closes loses every per-tab log
//! entry. Global statistics are left alone: tracker history spans sites.

use tracing::info;

use super::tab_log_manager::{TabLogManager, TabLogManagerTrait};
use crate::types::errors::StoreError;
use crate::types::event::TabLifecycleEvent;

/// Prunes the per-tab log in response to lifecycle events.
pub struct TabLifecycleReconciler<'a, 'b> {
    log: &'b mut TabLogManager<'a>,
}

impl<'a, 'b> TabLifecycleReconciler<'a, 'b> {
    pub fn new(log: &'b mut TabLogManager<'a>) -> Self {
        Self { log }
    }

    /// Handles one lifecycle event and returns the number of entries removed.
    pub fn reconcile(&mut self, event: &TabLifecycleEvent) -> Result<usize, StoreError> {
        let tab_id = event.tab_id();
        let removed = self.log.purge_tab(tab_id)?;
        match event {
            TabLifecycleEvent::NavigationStarted { url, .. } => {
                info!(tab = %tab_id, url = %url, removed, "tab navigated, log reset");
            }
            TabLifecycleEvent::Closed { .. } => {
                info!(tab = %tab_id, removed, "tab closed, log reset");
            }
        }
        Ok(removed)
    }
}
