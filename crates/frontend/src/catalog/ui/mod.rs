//! Catalog list page: the query engine wired to the facet widgets, the
//! product grid and pagination.

pub mod details;
pub mod filters;

use contracts::catalog::{FacetMeta, Product};
use contracts::engagement::LikeResponse;
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::Element;

use crate::cart::store::{CartLine, CartStore};
use crate::cart::ui::MiniCart;
use crate::engagement::tracker::EngagementTracker;
use crate::shared::url_state;

use self::details::ProductDetails;
use self::filters::{CategorySelect, FacetDropdown, PriceRangeInputs, SearchBox, SortSelect};
use super::api::{self, CatalogRequest, ListRequestGuard};
use super::coordinator::FilterCoordinator;
use super::engine;
use super::state::{CatalogListState, MANAGED_PARAMS, PAGE_SIZE};

#[component]
pub fn CatalogPage() -> impl IntoView {
    let coordinator = FilterCoordinator::new();
    provide_context(coordinator);
    coordinator.install_outside_click();

    // state is seeded from the URL once, on mount
    let state = RwSignal::new(CatalogListState::from_query(&url_state::current_query()));
    let (products, set_products) = signal(Vec::<Product>::new());
    let (meta, set_meta) = signal(FacetMeta::default());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (selected, set_selected) = signal::<Option<i64>>(None);
    let guard = ListRequestGuard::new();

    let load_products = move || {
        let request = state.with_untracked(|s| CatalogRequest::from_filter(&s.filter));
        spawn_local(async move {
            set_loading.set(true);
            set_error.set(None);
            let abort = guard.begin();
            match api::fetch_catalog(&request, abort.as_ref()).await {
                Ok(paged) => {
                    set_products.set(paged.items);
                    guard.finish();
                }
                Err(err) => {
                    // a superseded request must not overwrite fresher state
                    if abort.as_ref().map(|s| s.aborted()).unwrap_or(false) {
                        return;
                    }
                    log::warn!("catalog load failed: {}", err);
                    set_error.set(Some("Failed to load the catalog".to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    // refetch when the filter changes (the memo dedups, so page flips stay
    // local); a newer fetch aborts the one it supersedes
    let active_filter = Memo::new(move |_| state.with(|s| s.filter.clone()));
    Effect::new(move |_| {
        active_filter.track();
        load_products();
    });

    spawn_local(async move {
        match api::fetch_meta().await {
            Ok(vocabularies) => set_meta.set(vocabularies),
            Err(err) => log::warn!("facet meta load failed: {}", err),
        }
    });

    // UI -> state -> URL, one-directional after mount
    Effect::new(move |_| {
        url_state::replace_query(MANAGED_PARAMS, &state.get().to_query());
    });

    // the engine's own reset observer; widgets clear their local state
    Effect::new(move |prev: Option<u64>| {
        let epoch = coordinator.reset_epoch.get();
        if prev.is_some_and(|p| p != epoch) {
            state.update(|s| s.reset());
        }
        epoch
    });

    let visible = Memo::new(move |_| {
        let current = state.get();
        products.with(|all| engine::apply(all, &current.filter))
    });
    let total_count = Memo::new(move |_| visible.with(|v| v.len()));
    let total_pages = Memo::new(move |_| engine::page_count(total_count.get(), PAGE_SIZE));
    let page_items = Memo::new(move |_| {
        let page = state.with(|s| s.page);
        visible.with(|v| engine::page_slice(v, page, PAGE_SIZE).to_vec())
    });

    let open_details = Callback::new(move |id: i64| set_selected.set(Some(id)));

    view! {
        <div class="catalog-page">
            <header class="catalog-toolbar">
                <SearchBox
                    value=Signal::derive(move || state.with(|s| s.filter.query.clone()))
                    on_change=Callback::new(move |query| state.update(|s| s.set_query(query)))
                />
                <CategorySelect
                    options=Signal::derive(move || meta.with(|m| m.categories.clone()))
                    value=Signal::derive(move || state.with(|s| s.filter.category.clone()))
                    on_change=Callback::new(move |category| state.update(|s| s.set_category(category)))
                />
                <FacetDropdown
                    name="popularity"
                    label="Popularity"
                    options=Signal::derive(move || meta.with(|m| m.popularity.clone()))
                    selected=Signal::derive(move || state.with(|s| s.filter.popularity.clone()))
                    on_change=Callback::new(move |set| state.update(|s| s.set_popularity(set)))
                />
                <FacetDropdown
                    name="material"
                    label="Material"
                    options=Signal::derive(move || meta.with(|m| m.materials.clone()))
                    selected=Signal::derive(move || state.with(|s| s.filter.material.clone()))
                    on_change=Callback::new(move |set| state.update(|s| s.set_material(set)))
                />
                <FacetDropdown
                    name="collection"
                    label="Collection"
                    options=Signal::derive(move || meta.with(|m| m.collections.clone()))
                    selected=Signal::derive(move || state.with(|s| s.filter.collection.clone()))
                    on_change=Callback::new(move |set| state.update(|s| s.set_collection(set)))
                />
                <PriceRangeInputs
                    on_change=Callback::new(move |(min, max)| state.update(|s| s.set_price_range(min, max)))
                />
                <SortSelect
                    value=Signal::derive(move || state.with(|s| s.filter.sort))
                    on_change=Callback::new(move |sort| state.update(|s| s.set_sort(sort)))
                />
                <button class="catalog-reset" on:click=move |_| coordinator.reset()>
                    "Clear filters"
                </button>
                <button class="catalog-refresh" on:click=move |_| load_products()>
                    "Refresh"
                </button>
            </header>

            <Show when=move || error.get().is_some()>
                <div class="catalog-error">{move || error.get().unwrap_or_default()}</div>
            </Show>
            <Show when=move || loading.get()>
                <div class="catalog-loading">"Loading..."</div>
            </Show>

            {move || {
                selected
                    .get()
                    .map(|id| {
                        view! {
                            <ProductDetails
                                id=id
                                on_close=Callback::new(move |_| set_selected.set(None))
                            />
                        }
                    })
            }}

            <div class="catalog-grid">
                <For
                    each=move || page_items.get()
                    key=|product| product.id
                    children=move |product: Product| {
                        view! { <ProductCard product=product on_open=open_details/> }
                    }
                />
            </div>

            <PaginationControls
                current_page=Signal::derive(move || state.with(|s| s.page))
                total_pages=Signal::derive(move || total_pages.get())
                total_count=Signal::derive(move || total_count.get())
                on_page_change=Callback::new(move |page| state.update(|s| s.set_page(page)))
            />

            <MiniCart/>
        </div>
    }
}

/// A single product card. Registers one view when it first becomes
/// sufficiently visible.
#[component]
fn ProductCard(product: Product, on_open: Callback<i64>) -> impl IntoView {
    let tracker = use_context::<EngagementTracker>().expect("EngagementTracker not found");
    let cart = use_context::<CartStore>().expect("CartStore not found");
    let id = product.id;
    let node = NodeRef::<Div>::new();
    let (view_count, set_view_count) = signal::<Option<u64>>(None);
    let (like_count, set_like_count) = signal::<Option<u64>>(None);

    Effect::new(move |_| {
        if let Some(element) = node.get() {
            let element: &Element = element.as_ref();
            tracker.observe_card(
                element,
                id,
                Callback::new(move |count| set_view_count.set(Some(count))),
            );
        }
    });

    let liked = move || tracker.favorites.is_liked(id);
    let card_line = CartLine {
        id: product.id,
        slug: product.slug.clone(),
        name: product.name.clone(),
        image: product.image.clone(),
        price: product.price.clone(),
        categories: product.categories.clone(),
        selected_color: String::new(),
        selected_model: String::new(),
        quantity: 1,
    };

    view! {
        <div class="product-card" node_ref=node on:click=move |_| on_open.run(id)>
            <img class="product-card__image" src=product.image.clone() alt=product.name.clone()/>
            <div class="product-card__name">{product.name.clone()}</div>
            <div class="product-card__price">{product.price.clone()}</div>
            <div class="product-card__meta">
                {move || view_count.get().map(|n| format!("{} views", n))}
                {move || like_count.get().map(|n| format!(" {} likes", n))}
            </div>
            <button
                class=move || {
                    if liked() {
                        "product-card__like product-card__like--active"
                    } else {
                        "product-card__like"
                    }
                }
                on:click=move |ev| {
                    ev.stop_propagation();
                    tracker
                        .toggle_like(
                            id,
                            Callback::new(move |resp: LikeResponse| {
                                set_like_count.set(Some(resp.like_count))
                            }),
                        );
                }
            >
                "Like"
            </button>
            <button
                class="product-card__add"
                on:click=move |ev| {
                    ev.stop_propagation();
                    cart.add(card_line.clone());
                }
            >
                "Add to cart"
            </button>
        </div>
    }
}

/// Pagination over the filtered set, 1-based.
#[component]
fn PaginationControls(
    #[prop(into)] current_page: Signal<usize>,
    #[prop(into)] total_pages: Signal<usize>,
    #[prop(into)] total_count: Signal<usize>,
    on_page_change: Callback<usize>,
) -> impl IntoView {
    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page > 1 {
                        on_page_change.run(page - 1);
                    }
                }
                disabled=move || current_page.get() <= 1
            >
                "Prev"
            </button>
            <span class="pagination-info">
                {move || {
                    format!(
                        "{} / {} ({})",
                        current_page.get(),
                        total_pages.get().max(1),
                        total_count.get(),
                    )
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page < total_pages.get() {
                        on_page_change.run(page + 1);
                    }
                }
                disabled=move || current_page.get() >= total_pages.get()
            >
                "Next"
            </button>
        </div>
    }
}
