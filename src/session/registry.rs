use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::Session;

/// Opaque handle identifying one session inside a [`SessionRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey(u64);

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Per-user sessions for multi-threaded hosts.
///
/// Each session sits behind its own mutex, so an operation on one session
/// never interleaves with another operation on the same session, while
/// different sessions proceed independently.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_key: AtomicU64,
    sessions: Mutex<HashMap<SessionKey, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session and return its key.
    pub fn open(&self) -> SessionKey {
        let key = SessionKey(self.next_key.fetch_add(1, Ordering::Relaxed));
        self.lock_map()
            .insert(key, Arc::new(Mutex::new(Session::new())));
        debug!(%key, "session opened");
        key
    }

    /// Drop a session. Returns false if the key was unknown.
    pub fn close(&self, key: SessionKey) -> bool {
        let removed = self.lock_map().remove(&key).is_some();
        if removed {
            debug!(%key, "session closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_map().is_empty()
    }

    /// Run `f` with exclusive access to the session for `key`.
    ///
    /// Returns `None` if the key is unknown. The registry-wide lock is only
    /// held while looking the session up.
    pub fn with_session<R>(&self, key: SessionKey, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let session = self.lock_map().get(&key).cloned()?;
        let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut guard))
    }

    fn lock_map(&self) -> std::sync::MutexGuard<'_, HashMap<SessionKey, Arc<Mutex<Session>>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let a = registry.open();
        let b = registry.open();
        assert_ne!(a, b);

        registry
            .with_session(a, |s| s.load(b"Title,Year\nA,1\nB,2\n").map(|_| ()))
            .unwrap()
            .unwrap();
        registry.with_session(a, |s| s.next()).unwrap();

        assert_eq!(registry.with_session(a, |s| s.cursor()), Some(2));
        assert_eq!(registry.with_session(b, |s| s.cursor()), Some(0));
    }

    #[test]
    fn test_unknown_or_closed_key_returns_none() {
        let registry = SessionRegistry::new();
        let key = registry.open();
        assert_eq!(registry.len(), 1);
        assert!(registry.close(key));
        assert!(!registry.close(key));
        assert!(registry.is_empty());
        assert_eq!(registry.with_session(key, |s| s.cursor()), None);
    }

    #[test]
    fn test_concurrent_navigation_is_serialized() {
        let registry = Arc::new(SessionRegistry::new());
        let key = registry.open();
        let mut csv = String::from("Title,Year\n");
        for i in 0..200 {
            csv.push_str(&format!("Paper {i},{i}\n"));
        }
        registry
            .with_session(key, |s| s.load(csv.as_bytes()).map(|_| ()))
            .unwrap()
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..40 {
                        registry.with_session(key, |s| s.next());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.with_session(key, |s| s.cursor()), Some(161));
    }
}
