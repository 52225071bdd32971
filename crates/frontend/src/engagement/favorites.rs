//! Locally persisted liked-product set, reconciled with the server.
//!
//! The local set and a best-effort fetch of the server's liked set are
//! merged by union, so a like made while offline is never dropped by a
//! successful sync; when the server is unreachable the local set stays
//! authoritative.

use std::collections::BTreeSet;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::storage;

// version is carried in the key
const STORAGE_KEY: &str = "fav:v1";

pub(crate) fn decode_ids(raw: &str) -> BTreeSet<i64> {
    serde_json::from_str::<Vec<i64>>(raw)
        .map(|ids| ids.into_iter().collect())
        .unwrap_or_default()
}

#[derive(Clone, Copy)]
pub struct FavoritesStore {
    liked: RwSignal<BTreeSet<i64>>,
}

impl FavoritesStore {
    pub fn load() -> Self {
        let liked = storage::get_raw(STORAGE_KEY)
            .map(|raw| decode_ids(&raw))
            .unwrap_or_default();
        Self {
            liked: RwSignal::new(liked),
        }
    }

    pub(crate) fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            liked: RwSignal::new(ids.into_iter().collect()),
        }
    }

    /// Best-effort reconciliation against the server's liked set.
    pub fn sync_remote(&self) {
        let this = *self;
        spawn_local(async move {
            match super::api::fetch_liked_ids().await {
                Ok(ids) => {
                    this.liked.update(|local| local.extend(ids));
                    this.persist();
                }
                Err(err) => log::warn!("liked-set sync failed: {}", err),
            }
        });
    }

    /// Reactive read, for rendering like buttons.
    pub fn is_liked(&self, id: i64) -> bool {
        self.liked.with(|liked| liked.contains(&id))
    }

    /// Non-reactive read, for decisions inside event handlers.
    pub fn is_liked_now(&self, id: i64) -> bool {
        self.liked.with_untracked(|liked| liked.contains(&id))
    }

    pub fn set_liked(&self, id: i64, liked: bool) {
        self.liked.update(|set| {
            if liked {
                set.insert(id);
            } else {
                set.remove(&id);
            }
        });
        self.persist();
    }

    fn persist(&self) {
        let ids: Vec<i64> = self
            .liked
            .with_untracked(|liked| liked.iter().copied().collect());
        if let Ok(raw) = serde_json::to_string(&ids) {
            storage::set_raw(STORAGE_KEY, &raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ids() {
        assert_eq!(decode_ids("[3,1,3]"), BTreeSet::from([1, 3]));
        assert!(decode_ids("").is_empty());
        assert!(decode_ids("{bad").is_empty());
    }

    #[test]
    fn test_remote_merge_is_union() {
        let store = FavoritesStore::from_ids([1, 2]);
        // the offline like (2) survives a sync that does not know about it
        store.liked.update(|local| local.extend(vec![1, 3]));
        assert!(store.is_liked_now(1));
        assert!(store.is_liked_now(2));
        assert!(store.is_liked_now(3));
    }

    #[test]
    fn test_unlike_removes_locally() {
        let store = FavoritesStore::from_ids([5]);
        store.liked.update(|set| {
            set.remove(&5);
        });
        assert!(!store.is_liked_now(5));
    }
}
