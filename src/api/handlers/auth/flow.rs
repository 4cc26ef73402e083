//! Short-lived verification flows bridging OTP send and verify.
//!
//! The send step stores the phone number under a random flow id; the verify
//! step redeems the id exactly once. Nothing sensitive ever reaches the
//! client, and an id is useless after its TTL or first use.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use ulid::Ulid;

/// What kind of verification the flow completes, deciding where the client
/// lands afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Login,
    Signup,
}

impl FlowKind {
    #[must_use]
    pub const fn redirect_after_verify(self) -> &'static str {
        match self {
            Self::Login => "/dashboard",
            Self::Signup => "/onboarding",
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerificationFlow {
    pub id: String,
    pub kind: FlowKind,
    pub phone: String,
    issued_at: Instant,
}

/// In-memory store of pending flows, pruned on access.
#[derive(Debug)]
pub struct FlowStore {
    flows: Mutex<HashMap<String, VerificationFlow>>,
    ttl: Duration,
}

impl FlowStore {
    #[must_use]
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            flows: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Register a pending flow and return its id.
    pub async fn begin(&self, kind: FlowKind, phone: String) -> String {
        let id = Ulid::new().to_string();
        let mut flows = self.flows.lock().await;
        flows.retain(|_, flow| flow.issued_at.elapsed() < self.ttl);
        flows.insert(
            id.clone(),
            VerificationFlow {
                id: id.clone(),
                kind,
                phone,
                issued_at: Instant::now(),
            },
        );
        id
    }

    /// Redeem a flow id. Returns `None` for unknown, expired, or already
    /// redeemed ids; a successful take removes the flow.
    pub async fn take(&self, id: &str) -> Option<VerificationFlow> {
        let mut flows = self.flows.lock().await;
        flows.retain(|_, flow| flow.issued_at.elapsed() < self.ttl);
        flows.remove(id)
    }
}
