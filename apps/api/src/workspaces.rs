use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use logdesk_application::{LogTriageService, LogTriageSession};
use logdesk_core::ClientId;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

/// Shared handle to one client's triage session.
pub type SharedSession = Arc<Mutex<LogTriageSession>>;

/// Bounds on the number and lifetime of open client sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceLimits {
    pub idle_timeout: Duration,
    pub max_clients: usize,
}

struct WorkspaceSlot {
    session: SharedSession,
    last_used: Instant,
    last_used_tick: u64,
}

#[derive(Default)]
struct WorkspaceSlots {
    slots: HashMap<ClientId, WorkspaceSlot>,
    tick: u64,
}

impl WorkspaceSlots {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Per-client triage sessions, opened lazily on first request.
///
/// Sessions idle for longer than the timeout are dropped on the next access,
/// and the least recently used session makes room once the cap is reached.
pub struct ClientWorkspaces {
    service: LogTriageService,
    limits: WorkspaceLimits,
    sessions: Mutex<WorkspaceSlots>,
}

impl ClientWorkspaces {
    pub fn new(service: LogTriageService, limits: WorkspaceLimits) -> Self {
        Self {
            service,
            limits,
            sessions: Mutex::new(WorkspaceSlots::default()),
        }
    }

    /// Returns the client's session, loading store state when it is new.
    pub async fn session(&self, client: &ClientId) -> SharedSession {
        {
            let mut sessions = self.sessions.lock().await;
            let now = Instant::now();
            self.evict_idle(&mut sessions, now);

            let tick = sessions.next_tick();
            if let Some(slot) = sessions.slots.get_mut(client) {
                slot.last_used = now;
                slot.last_used_tick = tick;
                return Arc::clone(&slot.session);
            }
        }

        let opened = Arc::new(Mutex::new(self.service.open_session().await));
        let mut sessions = self.sessions.lock().await;
        if !sessions.slots.contains_key(client) {
            self.make_room(&mut sessions);
            info!(client = %client, "opened log triage session");
        }

        let now = Instant::now();
        let tick = sessions.next_tick();
        let slot = sessions
            .slots
            .entry(client.clone())
            .or_insert_with(|| WorkspaceSlot {
                session: opened,
                last_used: now,
                last_used_tick: tick,
            });
        slot.last_used = now;
        slot.last_used_tick = tick;

        Arc::clone(&slot.session)
    }

    pub async fn client_count(&self) -> usize {
        self.sessions.lock().await.slots.len()
    }

    fn evict_idle(&self, sessions: &mut WorkspaceSlots, now: Instant) {
        let before = sessions.slots.len();
        sessions
            .slots
            .retain(|_, slot| now.duration_since(slot.last_used) < self.limits.idle_timeout);

        let evicted = before - sessions.slots.len();
        if evicted > 0 {
            debug!(evicted, "dropped idle log triage sessions");
        }
    }

    fn make_room(&self, sessions: &mut WorkspaceSlots) {
        while sessions.slots.len() >= self.limits.max_clients.max(1) {
            let Some(oldest) = sessions
                .slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used_tick)
                .map(|(client, _)| client.clone())
            else {
                break;
            };

            sessions.slots.remove(&oldest);
            debug!(client = %oldest, "dropped least recently used log triage session");
        }
    }
}
