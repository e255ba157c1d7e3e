//! Session manager: the single owner of connection state.
//!
//! All session and tab mutation happens here, behind short critical sections
//! never held across an await point. Scans run as spawned tasks carrying a
//! [`ScanToken`]; a result is applied only while its token is still current,
//! so a superseded scan can finish whenever it likes without corrupting
//! fresher state.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use connector_protocols::{
    BrowserEvent, ConnectionState, ConnectorSettings, DiscoveryReason, ProbeOutcome, ScanResult,
    ServerCandidate, ServerIdentity, SettingsStore, StatusEvent, Transport,
};

use crate::config::ConnectorConfig;
use crate::context_sync::ContextSync;
use crate::error::SessionError;
use crate::events::EventBus;
use crate::reconnect::ReconnectScheduler;
use crate::scanner::CandidateScanner;
use crate::tabs::{TabContext, TabRegistry};
use crate::token::{ScanToken, TokenIssuer};
use crate::validator::IdentityValidator;

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Read-only copy of the session state for UIs and CLIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    /// Current session state.
    pub state: ConnectionState,
    /// Active candidate when connected.
    pub candidate: Option<ServerCandidate>,
    /// Verified identity when connected.
    pub identity: Option<ServerIdentity>,
}

/// The mutable authoritative connection record.
#[derive(Debug)]
struct ConnectionSession {
    state: ConnectionState,
    active_candidate: Option<ServerCandidate>,
    identity: Option<ServerIdentity>,
    scan_generation: u64,
}

impl ConnectionSession {
    fn new() -> Self {
        Self {
            state: ConnectionState::Idle,
            active_candidate: None,
            identity: None,
            scan_generation: 0,
        }
    }

    /// Move to `next`, keeping the candidate/identity invariant: set only on
    /// entry to `Connected`, cleared only on exit from `Connected`.
    ///
    /// Returns the status event to publish, when the transition warrants one
    /// (into/out of `Connected`, or into `Disconnected`).
    fn apply(
        &mut self,
        next: ConnectionState,
        candidate: Option<ServerCandidate>,
        identity: Option<ServerIdentity>,
    ) -> Option<StatusEvent> {
        let prev = self.state;
        self.state = next;
        if next == ConnectionState::Connected {
            self.active_candidate = candidate;
            self.identity = identity;
        } else if prev == ConnectionState::Connected {
            self.active_candidate = None;
            self.identity = None;
        }

        let emit = prev == ConnectionState::Connected
            || next == ConnectionState::Connected
            || next == ConnectionState::Disconnected;
        emit.then(|| StatusEvent::ConnectionStatusChanged {
            state: self.state,
            candidate: self.active_candidate.clone(),
            identity: self.identity.clone(),
        })
    }

    fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            state: self.state,
            candidate: self.active_candidate.clone(),
            identity: self.identity.clone(),
        }
    }
}

struct SessionInner {
    config: ConnectorConfig,
    store: Arc<dyn SettingsStore>,
    settings: Mutex<ConnectorSettings>,
    session: Mutex<ConnectionSession>,
    tabs: Mutex<TabRegistry>,
    tokens: TokenIssuer,
    scanner: CandidateScanner,
    validator: IdentityValidator,
    sync: ContextSync,
    reconnect: ReconnectScheduler,
    events: EventBus,
}

/// Single owner of the connection session and tab registry.
///
/// Cheap to clone; all clones share the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    /// Create a manager over the given host capabilities.
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn SettingsStore>,
        config: ConnectorConfig,
    ) -> Self {
        let validator = IdentityValidator::new(transport.clone());
        let scanner = CandidateScanner::new(validator.clone(), config.probe_timeout());
        let sync = ContextSync::new(transport, &config);
        let reconnect = ReconnectScheduler::new(config.reconnect_delay());
        let events = EventBus::new(config.event_capacity);

        Self {
            inner: Arc::new(SessionInner {
                config,
                store,
                settings: Mutex::new(ConnectorSettings::default()),
                session: Mutex::new(ConnectionSession::new()),
                tabs: Mutex::new(TabRegistry::new()),
                tokens: TokenIssuer::new(),
                scanner,
                validator,
                sync,
                reconnect,
                events,
            }),
        }
    }

    /// Load persisted settings; a missing record falls back to defaults.
    pub async fn start(&self) -> Result<(), SessionError> {
        match self.inner.store.load().await? {
            Some(settings) => {
                info!(
                    candidate = %settings.configured_candidate(),
                    "loaded persisted settings"
                );
                *self.inner.settings.lock() = settings;
            }
            None => debug!("no persisted settings, using defaults"),
        }
        Ok(())
    }

    /// Subscribe to status events.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.inner.events.subscribe()
    }

    /// Read-only snapshot of the session state.
    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.inner.session.lock().snapshot()
    }

    /// Copy of the current settings.
    pub fn settings(&self) -> ConnectorSettings {
        self.inner.settings.lock().clone()
    }

    /// Context for one tab, if tracked.
    pub fn tab(&self, tab_id: i64) -> Option<TabContext> {
        self.inner.tabs.lock().get(tab_id).cloned()
    }

    /// Handle a browser-delivered event.
    pub async fn handle_event(&self, event: BrowserEvent) {
        match event {
            BrowserEvent::UrlChanged { tab_id, url } => {
                self.sync_tab(tab_id, url, "tab_url_change").await;
            }
            BrowserEvent::PageLoadComplete { tab_id, url } => {
                self.sync_tab(tab_id, url, "page_complete").await;
                // A refresh always cancels and restarts discovery, connected
                // or not.
                self.request_discovery(DiscoveryReason::Refresh, true);
            }
            BrowserEvent::TabActivated { tab_id, url } => {
                self.inner.tabs.lock().activate(tab_id, url.clone());
                if let Some(url) = url {
                    self.sync_tab(tab_id, url, "tab_activated").await;
                }
            }
            BrowserEvent::TabClosed { tab_id } => {
                self.inner.tabs.lock().remove(tab_id);
            }
        }
    }

    /// Explicit user reconnect: cancel-and-restart discovery.
    pub fn reconnect(&self) {
        self.request_discovery(DiscoveryReason::Explicit, true);
    }

    /// Request a discovery scan.
    ///
    /// Only one scan runs at a time: a forced request invalidates the running
    /// scan's token before its replacement starts; a non-forced request while
    /// one is running is ignored.
    pub fn request_discovery(&self, reason: DiscoveryReason, force: bool) {
        self.inner.events.publish(StatusEvent::DiscoveryRequested {
            reason,
            force_restart: force,
        });

        let (token, event) = {
            let mut session = self.inner.session.lock();
            if session.state == ConnectionState::Discovering && !force {
                debug!(?reason, "discovery already in progress, ignoring request");
                return;
            }
            // Invalidate the running scan before its replacement starts, so
            // a late completion can never overwrite fresher state.
            let token = self.inner.tokens.issue();
            session.scan_generation = token.id();
            let event = session.apply(ConnectionState::Discovering, None, None);
            (token, event)
        };
        if let Some(event) = event {
            self.inner.events.publish(event);
        }
        self.inner.reconnect.disarm();

        info!(?reason, force, generation = token.id(), "starting discovery scan");
        let manager = self.clone();
        tokio::spawn(async move {
            manager.run_scan(token).await;
        });
    }

    /// Explicit liveness probe of the active candidate (or, when none, the
    /// configured one).
    ///
    /// A failure while `Connected` transitions the session to `Disconnected`
    /// without starting a scan and arms the reconnect timer.
    pub async fn check_connection(&self) -> bool {
        let (active, generation) = {
            let session = self.inner.session.lock();
            (session.active_candidate.clone(), session.scan_generation)
        };
        let candidate =
            active.unwrap_or_else(|| self.inner.settings.lock().configured_candidate());

        let outcome = self
            .inner
            .validator
            .validate(&candidate, self.inner.config.check_timeout())
            .await;
        if matches!(outcome, ProbeOutcome::Verified(_)) {
            debug!(%candidate, "liveness check passed");
            return true;
        }

        let event = {
            let mut session = self.inner.session.lock();
            // Only demote the session the check was issued against.
            if session.state == ConnectionState::Connected
                && session.scan_generation == generation
            {
                warn!(%candidate, "liveness check failed, marking disconnected");
                session.apply(ConnectionState::Disconnected, None, None)
            } else {
                None
            }
        };
        if let Some(event) = event {
            self.inner.events.publish(event);
            self.arm_reconnect();
        }
        false
    }

    /// Sync a tab's URL: cache always, delivery only while connected.
    pub async fn sync_tab(&self, tab_id: i64, url: impl Into<String>, source: &str) {
        let url = url.into();
        self.inner.tabs.lock().record_url(tab_id, url.clone());

        let candidate = {
            let session = self.inner.session.lock();
            if session.state == ConnectionState::Connected {
                session.active_candidate.clone()
            } else {
                None
            }
        };
        let Some(candidate) = candidate else {
            debug!(tab_id, source, "not connected, cached url only");
            return;
        };

        let payload = ContextSync::payload(tab_id, url, source);
        if self.inner.sync.deliver(&candidate, &payload).await {
            self.inner.tabs.lock().mark_synced(tab_id, Utc::now());
        }
    }

    async fn run_scan(&self, token: ScanToken) {
        let settings = self.inner.settings.lock().clone();
        let candidates = CandidateScanner::candidate_order(&settings);
        let result = self.inner.scanner.scan(&candidates, &token).await;
        self.apply_scan_result(token, result).await;
    }

    async fn apply_scan_result(&self, token: ScanToken, result: ScanResult) {
        let event = {
            let mut session = self.inner.session.lock();
            if session.scan_generation != token.id() || !token.is_current() {
                debug!(generation = token.id(), "discarding stale scan result");
                return;
            }
            match &result {
                ScanResult::Found {
                    candidate,
                    identity,
                } => {
                    info!(
                        %candidate,
                        name = %identity.name,
                        version = %identity.version,
                        "session connected"
                    );
                    session.apply(
                        ConnectionState::Connected,
                        Some(candidate.clone()),
                        Some(identity.clone()),
                    )
                }
                ScanResult::NotFound => {
                    info!("no companion server found");
                    session.apply(ConnectionState::Disconnected, None, None)
                }
            }
        };
        if let Some(event) = event {
            self.inner.events.publish(event);
        }

        match result {
            ScanResult::Found { candidate, .. } => {
                self.inner.reconnect.disarm();
                self.persist_candidate(&candidate).await;
                self.sync_active_tab("auto_discovery").await;
            }
            ScanResult::NotFound => self.arm_reconnect(),
        }
    }

    /// Persist the winning candidate when it differs from the stored record.
    async fn persist_candidate(&self, candidate: &ServerCandidate) {
        let updated = {
            let mut settings = self.inner.settings.lock();
            if settings.configured_candidate() == *candidate {
                None
            } else {
                settings.set_candidate(candidate);
                Some(settings.clone())
            }
        };
        if let Some(settings) = updated {
            match self.inner.store.save(&settings).await {
                Ok(()) => info!(%candidate, "persisted discovered server as preferred"),
                Err(err) => warn!(%err, "failed to persist discovered server"),
            }
        }
    }

    async fn sync_active_tab(&self, source: &str) {
        let active = self.inner.tabs.lock().active_tab().cloned();
        if let Some(tab) = active {
            if let Some(url) = tab.last_known_url {
                self.sync_tab(tab.tab_id, url, source).await;
            }
        }
    }

    fn arm_reconnect(&self) {
        let manager = self.clone();
        self.inner.reconnect.arm(move || async move {
            if manager.snapshot().state == ConnectionState::Disconnected {
                debug!("reconnect timer fired");
                manager.request_discovery(DiscoveryReason::Scheduled, false);
            }
        });
    }
}
