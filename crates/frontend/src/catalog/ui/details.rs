//! Product details view: immediate view registration, like toggling,
//! rating, and add-to-cart with color/model selection.

use contracts::catalog::Product;
use contracts::engagement::{LikeResponse, RatingResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::cart::store::{CartLine, CartStore};
use crate::catalog::api::{self, ProductFetch};
use crate::engagement::tracker::EngagementTracker;

#[component]
pub fn ProductDetails(id: i64, on_close: Callback<()>) -> impl IntoView {
    let tracker = use_context::<EngagementTracker>().expect("EngagementTracker not found");
    let cart = use_context::<CartStore>().expect("CartStore not found");

    let (product, set_product) = signal::<Option<Product>>(None);
    let (not_found, set_not_found) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (view_count, set_view_count) = signal::<Option<u64>>(None);
    let (like_count, set_like_count) = signal::<Option<u64>>(None);
    let (rating, set_rating) = signal::<Option<RatingResponse>>(None);
    let color = RwSignal::new(String::new());
    let model = RwSignal::new(String::new());

    spawn_local(async move {
        match api::fetch_product(id).await {
            Ok(ProductFetch::Found(found)) => {
                set_product.set(Some(*found));
                // immediate mode, guarded by the session set
                tracker.register_view(
                    id,
                    Callback::new(move |count| set_view_count.set(Some(count))),
                );
            }
            Ok(ProductFetch::NotFound) => set_not_found.set(true),
            Err(err) => {
                log::warn!("product {} load failed: {}", id, err);
                set_error.set(Some("Failed to load the product".to_string()));
            }
        }
    });

    let on_rating = Callback::new(move |resp: RatingResponse| set_rating.set(Some(resp)));

    view! {
        <div class="product-details">
            <button class="product-details__close" on:click=move |_| on_close.run(())>
                "Back"
            </button>

            <Show when=move || not_found.get()>
                <div class="product-details__not-found">"Product not found"</div>
            </Show>
            <Show when=move || error.get().is_some()>
                <div class="product-details__error">{move || error.get().unwrap_or_default()}</div>
            </Show>

            {move || {
                product
                    .get()
                    .map(|item| {
                        let liked = move || tracker.favorites.is_liked(id);
                        let for_cart = item.clone();
                        view! {
                            <div class="product-details__body">
                                <img src=item.image.clone() alt=item.name.clone()/>
                                <h1>{item.name.clone()}</h1>
                                <div class="product-details__price">{item.price.clone()}</div>
                                <div class="product-details__meta">
                                    {move || view_count.get().map(|n| format!("{} views", n))}
                                    {move || like_count.get().map(|n| format!(" {} likes", n))}
                                    {move || {
                                        rating
                                            .get()
                                            .map(|r| format!(" rated {:.1}", r.avg_rating))
                                    }}
                                </div>

                                <button
                                    class=move || {
                                        if liked() {
                                            "product-details__like product-details__like--active"
                                        } else {
                                            "product-details__like"
                                        }
                                    }
                                    on:click=move |_| {
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

                                <div class="product-details__rating">
                                    {(1u8..=5)
                                        .map(|value| {
                                            view! {
                                                <button on:click=move |_| {
                                                    tracker.set_rating(id, value, on_rating)
                                                }>{value}</button>
                                            }
                                        })
                                        .collect_view()}
                                    <button on:click=move |_| tracker.clear_rating(id, on_rating)>
                                        "Clear"
                                    </button>
                                </div>

                                <div class="product-details__variant">
                                    <input
                                        type="text"
                                        placeholder="Color"
                                        prop:value=move || color.get()
                                        on:input=move |ev| color.set(event_target_value(&ev))
                                    />
                                    <input
                                        type="text"
                                        placeholder="Model"
                                        prop:value=move || model.get()
                                        on:input=move |ev| model.set(event_target_value(&ev))
                                    />
                                    <button on:click=move |_| {
                                        cart.add(CartLine {
                                            id: for_cart.id,
                                            slug: for_cart.slug.clone(),
                                            name: for_cart.name.clone(),
                                            image: for_cart.image.clone(),
                                            price: for_cart.price.clone(),
                                            categories: for_cart.categories.clone(),
                                            selected_color: color.get_untracked(),
                                            selected_model: model.get_untracked(),
                                            quantity: 1,
                                        });
                                    }>"Add to cart"</button>
                                </div>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
