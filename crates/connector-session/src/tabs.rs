//! Per-tab context registry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

#[cfg(test)]
#[path = "tabs_tests.rs"]
mod tests;

/// Context tracked for one browser tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabContext {
    /// Browser tab id.
    pub tab_id: i64,
    /// Last URL observed for the tab, tracked even while disconnected.
    pub last_known_url: Option<String>,
    /// When a URL for this tab last reached the server.
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl TabContext {
    fn new(tab_id: i64) -> Self {
        Self {
            tab_id,
            last_known_url: None,
            last_synced_at: None,
        }
    }
}

/// Registry of tab contexts, owned exclusively by the session manager.
#[derive(Debug, Default)]
pub struct TabRegistry {
    tabs: HashMap<i64, TabContext>,
    active: Option<i64>,
}

impl TabRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a URL observation, creating the context on first sight.
    pub fn record_url(&mut self, tab_id: i64, url: impl Into<String>) {
        let context = self
            .tabs
            .entry(tab_id)
            .or_insert_with(|| TabContext::new(tab_id));
        context.last_known_url = Some(url.into());
    }

    /// Mark a tab active, recording its URL when known.
    pub fn activate(&mut self, tab_id: i64, url: Option<String>) {
        self.tabs
            .entry(tab_id)
            .or_insert_with(|| TabContext::new(tab_id));
        if let Some(url) = url {
            self.record_url(tab_id, url);
        }
        self.active = Some(tab_id);
    }

    /// Stamp a successful delivery for a tab.
    pub fn mark_synced(&mut self, tab_id: i64, at: DateTime<Utc>) {
        if let Some(context) = self.tabs.get_mut(&tab_id) {
            context.last_synced_at = Some(at);
        }
    }

    /// Drop a closed tab.
    pub fn remove(&mut self, tab_id: i64) {
        self.tabs.remove(&tab_id);
        if self.active == Some(tab_id) {
            self.active = None;
        }
    }

    /// Context for one tab.
    pub fn get(&self, tab_id: i64) -> Option<&TabContext> {
        self.tabs.get(&tab_id)
    }

    /// The active tab's context, if any.
    pub fn active_tab(&self) -> Option<&TabContext> {
        self.active.and_then(|id| self.tabs.get(&id))
    }

    /// Number of tracked tabs.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Whether no tabs are tracked.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}
