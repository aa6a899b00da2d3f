//! Concurrent session registry with idle sweeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use enumgen_parser::registry::LanguageRegistry;

use crate::errors::SessionError;
use crate::session::CodeSession;

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Lifetime counters, monotonically increasing.
#[derive(Debug, Default)]
pub struct SessionStats {
    created: AtomicU64,
    destroyed: AtomicU64,
    swept: AtomicU64,
}

impl SessionStats {
    #[must_use]
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn destroyed(&self) -> u64 {
        self.destroyed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn swept(&self) -> u64 {
        self.swept.load(Ordering::Relaxed)
    }
}

/// Shared registry of live sessions, keyed by caller-chosen id.
///
/// Sessions are handed out behind `Arc<Mutex<_>>` so callers can hold one
/// across mutations while the manager keeps serving others.
pub struct SessionManager {
    sessions: DashMap<String, Arc<Mutex<CodeSession>>>,
    languages: LanguageRegistry,
    idle_timeout: Duration,
    stats: SessionStats,
}

impl SessionManager {
    #[must_use]
    pub fn new(languages: LanguageRegistry) -> Self {
        Self::with_idle_timeout(languages, DEFAULT_IDLE_TIMEOUT)
    }

    #[must_use]
    pub fn with_idle_timeout(languages: LanguageRegistry, idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            languages,
            idle_timeout,
            stats: SessionStats::default(),
        }
    }

    /// Creates a session for a registered language.
    pub fn create(
        &self,
        id: &str,
        language: &str,
    ) -> Result<Arc<Mutex<CodeSession>>, SessionError> {
        let backend = self
            .languages
            .backend_for_language(language)
            .map_err(|_| SessionError::UnknownLanguage {
                language: language.to_string(),
            })?;
        if self.sessions.contains_key(id) {
            return Err(SessionError::DuplicateSession { id: id.to_string() });
        }
        let session = Arc::new(Mutex::new(CodeSession::new(id, backend)));
        self.sessions.insert(id.to_string(), Arc::clone(&session));
        self.stats.created.fetch_add(1, Ordering::Relaxed);
        debug!(session = id, language, "session created");
        Ok(session)
    }

    /// Looks a session up and marks it used.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Mutex<CodeSession>>> {
        let session = self.sessions.get(id).map(|entry| Arc::clone(entry.value()))?;
        session.lock().touch();
        Some(session)
    }

    /// Disposes and drops a session. Destroying a session twice, or one
    /// that never existed, is a no-op returning `false`.
    pub fn destroy(&self, id: &str) -> bool {
        let Some((_, session)) = self.sessions.remove(id) else {
            return false;
        };
        session.lock().dispose();
        self.stats.destroyed.fetch_add(1, Ordering::Relaxed);
        debug!(session = id, "session destroyed");
        true
    }

    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Destroys every session idle past the timeout, returning how many.
    ///
    /// Session mutexes are never taken while the map is being iterated, so
    /// a caller holding a session handle across its own map operations
    /// cannot interleave with the sweeper into a lock cycle.
    pub fn sweep(&self) -> usize {
        let sessions: Vec<(String, Arc<Mutex<CodeSession>>)> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        let mut swept: u64 = 0;
        for (id, session) in sessions {
            // A held mutex means the session is in use, so it is not idle.
            let idle = session
                .try_lock()
                .is_some_and(|session| session.idle_for() >= self.idle_timeout);
            if idle && self.destroy(&id) {
                swept += 1;
            }
        }
        if swept > 0 {
            self.stats.swept.fetch_add(swept, Ordering::Relaxed);
            info!(swept, "idle sessions swept");
        }
        usize::try_from(swept).unwrap_or(usize::MAX)
    }
}

/// Spawns the background sweeper. The thread exits on its own once the
/// manager is dropped.
pub fn spawn_sweeper(manager: &Arc<SessionManager>, interval: Duration) -> thread::JoinHandle<()> {
    let weak = Arc::downgrade(manager);
    thread::spawn(move || loop {
        thread::sleep(interval);
        let Some(manager) = weak.upgrade() else {
            break;
        };
        manager.sweep();
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(LanguageRegistry::new())
    }

    #[test]
    fn create_rejects_duplicates_and_unknown_languages() {
        let manager = manager();
        manager.create("a", "csharp").unwrap();
        assert!(matches!(
            manager.create("a", "csharp"),
            Err(SessionError::DuplicateSession { .. })
        ));
        assert!(matches!(
            manager.create("b", "cobol"),
            Err(SessionError::UnknownLanguage { .. })
        ));
    }

    #[test]
    fn destroy_is_idempotent() {
        let manager = manager();
        manager.create("a", "csharp").unwrap();
        assert!(manager.destroy("a"));
        assert!(!manager.destroy("a"));
        assert!(manager.get("a").is_none());
        assert_eq!(manager.stats().destroyed(), 1);
    }

    #[test]
    fn destroyed_sessions_fail_even_through_held_handles() {
        let manager = manager();
        let session = manager.create("a", "csharp").unwrap();
        assert!(manager.destroy("a"));
        assert!(matches!(
            session.lock().compilation(),
            Err(SessionError::Disposed { .. })
        ));
    }

    #[test]
    fn sweep_destroys_only_idle_sessions() {
        let manager =
            SessionManager::with_idle_timeout(LanguageRegistry::new(), Duration::ZERO);
        manager.create("idle", "csharp").unwrap();
        assert_eq!(manager.sweep(), 1);
        assert!(manager.is_empty());
        assert_eq!(manager.stats().swept(), 1);
    }

    #[test]
    fn sweep_never_blocks_on_a_held_session_handle() {
        let manager =
            SessionManager::with_idle_timeout(LanguageRegistry::new(), Duration::ZERO);
        let busy = manager.create("busy", "csharp").unwrap();
        manager.create("idle", "csharp").unwrap();

        let guard = busy.lock();
        assert_eq!(manager.sweep(), 1, "only the unheld session is swept");
        assert!(manager.get("busy").is_some());
        drop(guard);

        assert_eq!(manager.sweep(), 1);
        assert!(manager.is_empty());
    }

    #[test]
    fn list_is_sorted() {
        let manager = manager();
        manager.create("b", "csharp").unwrap();
        manager.create("a", "csharp").unwrap();
        assert_eq!(manager.list(), vec!["a".to_string(), "b".to_string()]);
    }
}
