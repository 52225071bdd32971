//! Per-session view dedup.
//!
//! The viewed set lives in a session object created once at application
//! start and provided via context — never a module-level global. It is
//! intentionally not persisted: a reload starts a fresh session.

use std::collections::HashSet;

use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct EngagementSession {
    viewed: RwSignal<HashSet<i64>>,
}

impl Default for EngagementSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EngagementSession {
    pub fn new() -> Self {
        Self {
            viewed: RwSignal::new(HashSet::new()),
        }
    }

    /// Synchronous check-and-insert. Returns true only the first time an id
    /// is seen; callers issue the network call only on true, so two
    /// callbacks racing on the same id cannot both fire it. The transition
    /// is monotonic — nothing ever removes an id within a session.
    pub fn mark_viewed(&self, id: i64) -> bool {
        self.viewed
            .try_update(|seen| seen.insert(id))
            .unwrap_or(false)
    }

    pub fn was_viewed(&self, id: i64) -> bool {
        self.viewed.with_untracked(|seen| seen.contains(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_view_only() {
        let session = EngagementSession::new();
        assert!(session.mark_viewed(7));
        for _ in 0..10 {
            assert!(!session.mark_viewed(7));
        }
        assert!(session.was_viewed(7));
        assert!(!session.was_viewed(8));
    }

    #[test]
    fn test_ids_are_independent() {
        let session = EngagementSession::new();
        assert!(session.mark_viewed(1));
        assert!(session.mark_viewed(2));
        assert!(!session.mark_viewed(1));
    }
}
