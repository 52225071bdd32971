//! Mini cart widget: lines with quantity controls.

use leptos::prelude::*;

use super::store::{CartLine, CartStore};

fn variant_label(line: &CartLine) -> String {
    [line.selected_color.as_str(), line.selected_model.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" / ")
}

#[component]
pub fn MiniCart() -> impl IntoView {
    let cart = use_context::<CartStore>().expect("CartStore not found");

    view! {
        <div class="mini-cart">
            <div class="mini-cart__header">
                "Cart (" {move || cart.total_items()} ")"
            </div>
            <For
                each=move || cart.lines.get()
                key=|line| {
                    format!(
                        "{}|{}|{}|{}",
                        line.slug,
                        line.selected_color,
                        line.selected_model,
                        line.quantity,
                    )
                }
                children=move |line: CartLine| {
                    let dec = (
                        line.slug.clone(),
                        line.selected_color.clone(),
                        line.selected_model.clone(),
                    );
                    let inc = dec.clone();
                    let rem = dec.clone();
                    view! {
                        <div class="mini-cart__line">
                            <span class="mini-cart__name">{line.name.clone()}</span>
                            <span class="mini-cart__variant">{variant_label(&line)}</span>
                            <span class="mini-cart__price">{line.price.clone()}</span>
                            <button on:click=move |_| cart.decrease(&dec.0, &dec.1, &dec.2)>
                                "-"
                            </button>
                            <span class="mini-cart__quantity">{line.quantity}</span>
                            <button on:click=move |_| cart.increase(&inc.0, &inc.1, &inc.2)>
                                "+"
                            </button>
                            <button
                                class="mini-cart__remove"
                                on:click=move |_| cart.remove(&rem.0, &rem.1, &rem.2)
                            >
                                "Remove"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_label() {
        let mut line = CartLine {
            id: 1,
            slug: "tote".into(),
            name: "Tote".into(),
            image: String::new(),
            price: "100".into(),
            categories: vec![],
            selected_color: "black".into(),
            selected_model: "large".into(),
            quantity: 1,
        };
        assert_eq!(variant_label(&line), "black / large");
        line.selected_model.clear();
        assert_eq!(variant_label(&line), "black");
        line.selected_color.clear();
        assert_eq!(variant_label(&line), "");
    }
}
