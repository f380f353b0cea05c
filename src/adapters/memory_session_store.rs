//! In-memory session registry. Everything is lost on restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::{AppError, SessionId, SessionState};
use crate::ports::SessionStore;

const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct SessionSlot {
    state: SessionState,
    generating: bool,
    last_seen: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        Self { state: SessionState::default(), generating: false, last_seen: Instant::now() }
    }

    /// A slot with a generation in flight is never idle.
    fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        !self.generating && now.saturating_duration_since(self.last_seen) >= ttl
    }
}

type Slot = Arc<Mutex<SessionSlot>>;

/// One lock per session; the map lock is only held to find, add or evict slots.
///
/// Sessions idle for longer than the TTL are dropped when a new session is
/// created or when their cookie comes back.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Slot>>>,
    idle_ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self { sessions: Arc::default(), idle_ttl }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|sessions| sessions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: &SessionId) -> Result<Slot, AppError> {
        let sessions = self.sessions.read().map_err(|_| lock_poisoned())?;
        sessions.get(id).cloned().ok_or(AppError::SessionNotFound)
    }

    fn evict_idle(&self, sessions: &mut HashMap<SessionId, Slot>) {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, slot| match slot.lock() {
            Ok(slot) => !slot.is_idle(now, self.idle_ttl),
            Err(_) => false,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, live = sessions.len(), "idle sessions evicted");
        }
    }
}

fn lock_poisoned() -> AppError {
    AppError::config_error("Session store lock poisoned")
}

impl SessionStore for MemorySessionStore {
    fn create(&self) -> SessionId {
        let id = SessionId::generate();
        let slot = Arc::new(Mutex::new(SessionSlot::new()));
        let mut sessions = match self.sessions.write() {
            Ok(sessions) => sessions,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.evict_idle(&mut sessions);
        sessions.insert(id.clone(), slot);
        id
    }

    fn touch(&self, id: &SessionId) -> bool {
        let Ok(slot) = self.slot(id) else {
            return false;
        };
        let idle = match slot.lock() {
            Ok(mut slot) => {
                let now = Instant::now();
                if slot.is_idle(now, self.idle_ttl) {
                    true
                } else {
                    slot.last_seen = now;
                    false
                }
            }
            Err(_) => true,
        };
        if idle {
            if let Ok(mut sessions) = self.sessions.write() {
                sessions.remove(id);
            }
        }
        !idle
    }

    fn get(&self, id: &SessionId) -> Result<SessionState, AppError> {
        let slot = self.slot(id)?;
        let guard = slot.lock().map_err(|_| lock_poisoned())?;
        Ok(guard.state.clone())
    }

    fn set(&self, id: &SessionId, state: SessionState) -> Result<(), AppError> {
        let slot = self.slot(id)?;
        let mut guard = slot.lock().map_err(|_| lock_poisoned())?;
        guard.state = state;
        Ok(())
    }

    fn update(
        &self,
        id: &SessionId,
        f: &mut dyn FnMut(&SessionState) -> Result<SessionState, AppError>,
    ) -> Result<SessionState, AppError> {
        let slot = self.slot(id)?;
        let mut guard = slot.lock().map_err(|_| lock_poisoned())?;
        let next = f(&guard.state)?;
        guard.state = next.clone();
        Ok(next)
    }

    fn begin_generation(&self, id: &SessionId) -> Result<bool, AppError> {
        let slot = self.slot(id)?;
        let mut guard = slot.lock().map_err(|_| lock_poisoned())?;
        if guard.generating {
            return Ok(false);
        }
        guard.generating = true;
        Ok(true)
    }

    fn end_generation(&self, id: &SessionId) {
        if let Ok(slot) = self.slot(id) {
            match slot.lock() {
                Ok(mut guard) => guard.generating = false,
                Err(poisoned) => poisoned.into_inner().generating = false,
            }
        }
    }
}
