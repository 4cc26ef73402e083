//! Shared auth state: configuration, the session-event channel, and the
//! pending verification flows.

use serde::Serialize;
use tokio::sync::watch;
use utoipa::ToSchema;

use super::flow::FlowStore;
use crate::provider::types::Session;

const DEFAULT_FLOW_TTL_SECONDS: u64 = 300;

/// Server-side auth settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    frontend_base_url: String,
    flow_ttl_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            flow_ttl_seconds: DEFAULT_FLOW_TTL_SECONDS,
        }
    }

    #[must_use]
    pub const fn with_flow_ttl_seconds(mut self, seconds: u64) -> Self {
        self.flow_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub const fn flow_ttl_seconds(&self) -> u64 {
        self.flow_ttl_seconds
    }
}

/// What changed in the auth lifecycle.
#[derive(ToSchema, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthChange {
    InitialSession,
    SignedIn,
    OtpVerified,
    SignedOut,
}

/// Monotonic snapshot of the auth lifecycle. `seq` strictly increases with
/// every published change, so a client holding `seq` can ask for anything
/// newer and never observe the same change twice.
#[derive(ToSchema, Serialize, Debug, Clone)]
pub struct AuthSnapshot {
    pub seq: u64,
    pub change: AuthChange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    pub changed_at_unix: i64,
}

/// Broadcast of auth lifecycle changes. Readers subscribe and wait for a
/// snapshot newer than the one they already have.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: watch::Sender<AuthSnapshot>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEvents {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthSnapshot {
            seq: 0,
            change: AuthChange::InitialSession,
            session: None,
            changed_at_unix: chrono::Utc::now().timestamp(),
        });
        Self { tx }
    }

    /// Publish a change, bumping the sequence number. Succeeds whether or not
    /// anyone is currently waiting.
    pub fn publish(&self, change: AuthChange, session: Option<Session>) {
        self.tx.send_modify(|snapshot| {
            snapshot.seq += 1;
            snapshot.change = change;
            snapshot.session = session;
            snapshot.changed_at_unix = chrono::Utc::now().timestamp();
        });
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }
}

/// Everything the auth handlers share, injected as one extension.
#[derive(Debug)]
pub struct AuthState {
    config: AuthConfig,
    events: SessionEvents,
    flows: FlowStore,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let flows = FlowStore::new(config.flow_ttl_seconds());
        Self {
            config,
            events: SessionEvents::new(),
            flows,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub const fn events(&self) -> &SessionEvents {
        &self.events
    }

    #[must_use]
    pub const fn flows(&self) -> &FlowStore {
        &self.flows
    }
}
