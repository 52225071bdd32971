//! Facet widgets: search box, category and sort selects, multi-select
//! dropdowns and the price range.
//!
//! Widgets with local selection state watch the coordinator's reset
//! counter and clear themselves when it changes, notifying the engine with
//! an empty selection.

use std::collections::BTreeSet;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::catalog::coordinator::FilterCoordinator;
use crate::catalog::state::SortKey;

const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Monotonic epoch guarding debounced edits: a timer only fires if its
/// epoch is still current, and bumping the epoch invalidates every timer
/// already waiting.
#[derive(Clone, Copy)]
struct EditEpoch(RwSignal<u64>);

impl EditEpoch {
    fn new() -> Self {
        Self(RwSignal::new(0))
    }

    fn begin(&self) -> u64 {
        self.0
            .try_update(|epoch| {
                *epoch += 1;
                *epoch
            })
            .unwrap_or_default()
    }

    /// Drop any pending edit without starting a new one.
    fn invalidate(&self) {
        let _ = self.begin();
    }

    fn is_current(&self, mine: u64) -> bool {
        self.0.get_untracked() == mine
    }
}

#[component]
pub fn SearchBox(
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    let coordinator = use_context::<FilterCoordinator>().expect("FilterCoordinator not found");
    let draft = RwSignal::new(value.get_untracked());
    let edits = EditEpoch::new();

    Effect::new(move |prev: Option<u64>| {
        let reset = coordinator.reset_epoch.get();
        if prev.is_some_and(|p| p != reset) {
            draft.set(String::new());
            // a debounce still in flight must not resurrect the cleared query
            edits.invalidate();
        }
        reset
    });

    // debounce: only the latest edit reaches the engine
    let schedule = move |text: String| {
        let mine = edits.begin();
        spawn_local(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            if edits.is_current(mine) {
                on_change.run(text);
            }
        });
    };

    view! {
        <input
            class="search-box"
            type="text"
            placeholder="Search products"
            prop:value=move || draft.get()
            on:input=move |ev| {
                let text = event_target_value(&ev);
                draft.set(text.clone());
                schedule(text);
            }
        />
    }
}

/// Single-select category facet. No local state: the value is derived from
/// the engine, so the reset broadcast clears it through the engine.
#[component]
pub fn CategorySelect(
    #[prop(into)] options: Signal<Vec<String>>,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <select
            class="filter-dropdown category-select"
            prop:value=move || value.get()
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            <option value="">"All categories"</option>
            <For
                each=move || options.get()
                key=|option| option.clone()
                children=move |option: String| {
                    let this = option.clone();
                    view! {
                        <option value=option.clone() selected=move || value.get() == this>
                            {option.clone()}
                        </option>
                    }
                }
            />
        </select>
    }
}

#[component]
pub fn SortSelect(
    #[prop(into)] value: Signal<SortKey>,
    on_change: Callback<SortKey>,
) -> impl IntoView {
    view! {
        <select
            class="sort-control"
            prop:value=move || value.get().as_str().to_string()
            on:change=move |ev| on_change.run(SortKey::parse(&event_target_value(&ev)))
        >
            <option value="">"Featured"</option>
            <option value="name_asc">"Name (A-Z)"</option>
            <option value="name_desc">"Name (Z-A)"</option>
            <option value="price_asc">"Price (low to high)"</option>
            <option value="price_desc">"Price (high to low)"</option>
        </select>
    }
}

/// Multi-select facet dropdown. The coordinator keeps at most one of these
/// open; the local selection mirrors the engine's set.
#[component]
pub fn FacetDropdown(
    name: &'static str,
    label: &'static str,
    #[prop(into)] options: Signal<Vec<String>>,
    #[prop(into)] selected: Signal<BTreeSet<String>>,
    on_change: Callback<BTreeSet<String>>,
) -> impl IntoView {
    let coordinator = use_context::<FilterCoordinator>().expect("FilterCoordinator not found");
    let local = RwSignal::new(selected.get_untracked());

    Effect::new(move |prev: Option<u64>| {
        let reset = coordinator.reset_epoch.get();
        if prev.is_some_and(|p| p != reset) {
            local.set(BTreeSet::new());
            on_change.run(BTreeSet::new());
        }
        reset
    });

    let toggle_value = Callback::new(move |value: String| {
        local.update(|set| {
            if !set.remove(&value) {
                set.insert(value);
            }
        });
        on_change.run(local.get_untracked());
    });

    view! {
        <div class="filter-dropdown">
            <button
                class="filter-dropdown__toggle"
                on:click=move |ev| {
                    ev.stop_propagation();
                    coordinator.toggle(name);
                }
            >
                {label}
                {move || {
                    let count = local.with(|set| set.len());
                    if count > 0 { format!(" ({})", count) } else { String::new() }
                }}
            </button>
            <Show when=move || coordinator.is_open(name)>
                <div class="filter-dropdown__menu">
                    <For
                        each=move || options.get()
                        key=|option| option.clone()
                        children=move |option: String| {
                            let checked_for = option.clone();
                            let toggle_for = option.clone();
                            view! {
                                <label class="filter-dropdown__option">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || local.with(|set| set.contains(&checked_for))
                                        on:change=move |_| toggle_value.run(toggle_for.clone())
                                    />
                                    <span>{option}</span>
                                </label>
                            }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}

/// Inclusive price bounds; empty max means unbounded. Malformed input is
/// clamped by the state transition, not rejected.
#[component]
pub fn PriceRangeInputs(on_change: Callback<(f64, Option<f64>)>) -> impl IntoView {
    let coordinator = use_context::<FilterCoordinator>().expect("FilterCoordinator not found");
    let min_text = RwSignal::new(String::new());
    let max_text = RwSignal::new(String::new());

    Effect::new(move |prev: Option<u64>| {
        let reset = coordinator.reset_epoch.get();
        if prev.is_some_and(|p| p != reset) {
            min_text.set(String::new());
            max_text.set(String::new());
        }
        reset
    });

    let apply = move || {
        let min = min_text
            .get_untracked()
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0);
        let max = max_text.get_untracked().trim().parse::<f64>().ok();
        on_change.run((min, max));
    };

    view! {
        <div class="price-range filter-dropdown">
            <input
                class="price-range__min"
                type="number"
                placeholder="Min"
                prop:value=move || min_text.get()
                on:change=move |ev| {
                    min_text.set(event_target_value(&ev));
                    apply();
                }
            />
            <span>"-"</span>
            <input
                class="price-range__max"
                type="number"
                placeholder="Max"
                prop:value=move || max_text.get()
                on:change=move |ev| {
                    max_text.set(event_target_value(&ev));
                    apply();
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_invalidates_pending_edit() {
        let edits = EditEpoch::new();
        let pending = edits.begin();
        assert!(edits.is_current(pending));
        // the reset broadcast bumps the epoch, so the timer goes stale
        edits.invalidate();
        assert!(!edits.is_current(pending));
    }

    #[test]
    fn test_newer_edit_supersedes_older() {
        let edits = EditEpoch::new();
        let older = edits.begin();
        let newer = edits.begin();
        assert!(!edits.is_current(older));
        assert!(edits.is_current(newer));
    }
}
