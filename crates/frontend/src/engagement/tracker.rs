//! View and like tracking: at-most-once-per-session view counting, like
//! toggling serialized per product id.

use std::collections::HashSet;

use contracts::engagement::{LikeResponse, RatingResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::favorites::FavoritesStore;
use super::session::EngagementSession;

/// Fraction of a product card that must be visible before a view counts.
pub const VIEW_THRESHOLD: f64 = 0.5;

#[derive(Clone, Copy)]
pub struct EngagementTracker {
    session: EngagementSession,
    pub favorites: FavoritesStore,
    /// Product ids with a like/unlike call in flight. A toggle for an id
    /// already here is dropped, so rapid double-clicks cannot issue two
    /// concurrent calls whose responses land out of order.
    like_in_flight: RwSignal<HashSet<i64>>,
}

impl EngagementTracker {
    pub fn new(session: EngagementSession, favorites: FavoritesStore) -> Self {
        Self {
            session,
            favorites,
            like_in_flight: RwSignal::new(HashSet::new()),
        }
    }

    /// Immediate mode: a detail page registers its view as soon as it is
    /// ready. The session guard runs synchronously, before the async call.
    pub fn register_view(&self, id: i64, on_count: Callback<u64>) {
        if !self.session.mark_viewed(id) {
            return;
        }
        spawn_local(async move {
            match super::api::post_view(id).await {
                Ok(resp) => on_count.run(resp.view_count),
                Err(err) => log::warn!("view call failed for {}: {}", id, err),
            }
        });
    }

    /// On-visibility mode: observe a product card and count one view when
    /// it first crosses the threshold. The observer disconnects after the
    /// first qualifying entry, so a card scrolled in and out repeatedly
    /// never double-counts; the session guard additionally covers two
    /// cards for the same product.
    pub fn observe_card(&self, element: &Element, id: i64, on_count: Callback<u64>) {
        if self.session.was_viewed(id) {
            return;
        }
        let session = self.session;
        let closure = Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let crossed = entries.iter().any(|entry| {
                    entry
                        .dyn_into::<IntersectionObserverEntry>()
                        .map(|e| e.is_intersecting())
                        .unwrap_or(false)
                });
                if !crossed {
                    return;
                }
                observer.disconnect();
                // sync check-and-insert before the async call goes out
                if !session.mark_viewed(id) {
                    return;
                }
                spawn_local(async move {
                    match super::api::post_view(id).await {
                        Ok(resp) => on_count.run(resp.view_count),
                        Err(err) => log::warn!("view call failed for {}: {}", id, err),
                    }
                });
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(VIEW_THRESHOLD));
        match IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &options) {
            Ok(observer) => {
                observer.observe(element);
                closure.forget(); // owned by the observer for the card's lifetime
            }
            Err(err) => log::warn!("intersection observer unavailable: {:?}", err),
        }
    }

    /// Toggle the like state of a product. The local flag and count update
    /// only after the call resolves; a failure leaves prior state in place.
    pub fn toggle_like(&self, id: i64, on_update: Callback<LikeResponse>) {
        let started = self
            .like_in_flight
            .try_update(|in_flight| in_flight.insert(id))
            .unwrap_or(false);
        if !started {
            return; // a call for this id is already in flight
        }
        let currently_liked = self.favorites.is_liked_now(id);
        let this = *self;
        spawn_local(async move {
            let result = if currently_liked {
                super::api::delete_like(id).await
            } else {
                super::api::post_like(id).await
            };
            this.like_in_flight.update(|in_flight| {
                in_flight.remove(&id);
            });
            match result {
                Ok(resp) => {
                    this.favorites.set_liked(id, resp.liked);
                    on_update.run(resp);
                }
                Err(err) => log::warn!("like call failed for {}: {}", id, err),
            }
        });
    }

    pub fn set_rating(&self, id: i64, value: u8, on_update: Callback<RatingResponse>) {
        spawn_local(async move {
            match super::api::post_rating(id, value).await {
                Ok(resp) => on_update.run(resp),
                Err(err) => log::warn!("rating call failed for {}: {}", id, err),
            }
        });
    }

    pub fn clear_rating(&self, id: i64, on_update: Callback<RatingResponse>) {
        spawn_local(async move {
            match super::api::delete_rating(id).await {
                Ok(resp) => on_update.run(resp),
                Err(err) => log::warn!("rating call failed for {}: {}", id, err),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_in_flight_guard() {
        let tracker = EngagementTracker::new(
            EngagementSession::new(),
            FavoritesStore::from_ids([]),
        );
        // first insert wins, the second toggle would be dropped
        assert!(tracker
            .like_in_flight
            .try_update(|s| s.insert(9))
            .unwrap_or(false));
        assert!(!tracker
            .like_in_flight
            .try_update(|s| s.insert(9))
            .unwrap_or(false));
    }
}
