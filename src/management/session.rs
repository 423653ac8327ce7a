use std::{
    collections::HashMap,
    sync::{
        RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use crate::types::{Session, Token};

/// How long a logged-in session stays valid after its last use.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// How long a pending login (no token yet) waits for its callback.
pub const LOGIN_TTL: Duration = Duration::from_secs(10 * 60);
pub const MAX_SESSIONS: usize = 10_000;

/// Per-session storage for OAuth state and Spotify tokens, keyed by the
/// session id carried in the `sid` cookie.
pub trait SessionStore: Send + Sync {
    fn load(&self, session_id: &str) -> Option<Session>;

    fn store(&self, session_id: &str, session: Session);

    fn remove(&self, session_id: &str);

    fn token(&self, session_id: &str) -> Option<Token> {
        self.load(session_id).and_then(|s| s.token)
    }

    fn set_token(&self, session_id: &str, token: Token) {
        let mut session = self.load(session_id).unwrap_or_default();
        session.token = Some(token);
        self.store(session_id, session);
    }

    /// Returns the pending OAuth state and clears it, so it can be used once.
    fn take_oauth_state(&self, session_id: &str) -> Option<String> {
        let mut session = self.load(session_id)?;
        let state = session.oauth_state.take();
        self.store(session_id, session);
        state
    }

    /// Drops expired sessions. Stores without expiry have nothing to do.
    fn sweep(&self) {}

    /// Moves a session to `new_id` and forgets `old_id`.
    fn rename(&self, old_id: &str, new_id: &str) {
        let session = self.load(old_id).unwrap_or_default();
        self.remove(old_id);
        self.store(new_id, session);
    }
}

struct Entry {
    session: Session,
    touched: Instant,
    // strictly increasing per touch, orders entries for eviction
    seq: u64,
}

impl Entry {
    fn is_expired(&self, now: Instant, ttl: Duration, login_ttl: Duration) -> bool {
        let limit = if self.session.token.is_some() {
            ttl
        } else {
            login_ttl
        };
        now.duration_since(self.touched) >= limit
    }
}

/// Process-local session store. Sessions are lost on restart.
///
/// Entries expire after [`SESSION_TTL`] without use ([`LOGIN_TTL`] while the
/// login is still pending) and the store never holds more than `capacity`
/// sessions; the least recently used one is evicted first.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    next_seq: AtomicU64,
    ttl: Duration,
    login_ttl: Duration,
    capacity: usize,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_limits(SESSION_TTL, LOGIN_TTL, MAX_SESSIONS)
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, login_ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
            ttl,
            login_ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    // a panicking writer cannot leave a half-updated session behind, so
    // poisoning is ignored
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, session_id: &str) -> Option<Session> {
        let now = Instant::now();
        let mut sessions = self.write();

        let expired = sessions
            .get(session_id)?
            .is_expired(now, self.ttl, self.login_ttl);
        if expired {
            sessions.remove(session_id);
            return None;
        }

        let seq = self.next_seq();
        let entry = sessions.get_mut(session_id)?;
        entry.touched = now;
        entry.seq = seq;
        Some(entry.session.clone())
    }

    fn store(&self, session_id: &str, session: Session) {
        let now = Instant::now();
        let mut sessions = self.write();

        if !sessions.contains_key(session_id) && sessions.len() >= self.capacity {
            sessions.retain(|_, entry| !entry.is_expired(now, self.ttl, self.login_ttl));

            while sessions.len() >= self.capacity {
                let Some(oldest) = sessions
                    .iter()
                    .min_by_key(|(_, entry)| entry.seq)
                    .map(|(id, _)| id.clone())
                else {
                    break;
                };
                sessions.remove(&oldest);
            }
        }

        sessions.insert(
            session_id.to_string(),
            Entry {
                session,
                touched: now,
                seq: self.next_seq(),
            },
        );
    }

    fn remove(&self, session_id: &str) {
        self.write().remove(session_id);
    }

    fn sweep(&self) {
        let now = Instant::now();
        self.write()
            .retain(|_, entry| !entry.is_expired(now, self.ttl, self.login_ttl));
    }
}
