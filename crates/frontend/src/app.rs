use leptos::prelude::*;

use crate::cart::store::CartStore;
use crate::catalog::ui::CatalogPage;
use crate::engagement::favorites::FavoritesStore;
use crate::engagement::session::EngagementSession;
use crate::engagement::tracker::EngagementTracker;

#[component]
pub fn App() -> impl IntoView {
    // One engagement session per page load. View dedup lives in this
    // explicitly scoped object, not in a module-level global; it is never
    // persisted, so a reload starts a fresh session.
    let session = EngagementSession::new();
    let favorites = FavoritesStore::load();
    favorites.sync_remote();

    provide_context(session);
    provide_context(favorites);
    provide_context(EngagementTracker::new(session, favorites));
    provide_context(CartStore::load());

    view! { <CatalogPage/> }
}
