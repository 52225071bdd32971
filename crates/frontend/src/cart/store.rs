//! Durable, composite-keyed cart.
//!
//! A line's identity is `(slug, selectedColor, selectedModel)`; at most one
//! line exists per identity, adding an identical item increments its
//! quantity. Every mutation persists synchronously to localStorage, so the
//! cart survives reloads; absent or malformed storage falls back to an
//! empty cart.

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::storage;

const STORAGE_KEY: &str = "cart";
const STORAGE_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub selected_color: String,
    #[serde(default)]
    pub selected_model: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn same_identity(&self, slug: &str, color: &str, model: &str) -> bool {
        self.slug == slug && self.selected_color == color && self.selected_model == model
    }
}

pub(crate) fn add_line(lines: &mut Vec<CartLine>, item: CartLine) {
    if let Some(line) = lines
        .iter_mut()
        .find(|l| l.same_identity(&item.slug, &item.selected_color, &item.selected_model))
    {
        line.quantity += 1;
    } else {
        lines.push(CartLine { quantity: 1, ..item });
    }
}

pub(crate) fn increase_line(lines: &mut [CartLine], slug: &str, color: &str, model: &str) {
    if let Some(line) = lines.iter_mut().find(|l| l.same_identity(slug, color, model)) {
        line.quantity += 1;
    }
}

/// Decrease by one; a line that would reach zero is removed entirely, so a
/// quantity of 0 or less is never persisted.
pub(crate) fn decrease_line(lines: &mut Vec<CartLine>, slug: &str, color: &str, model: &str) {
    if let Some(pos) = lines.iter().position(|l| l.same_identity(slug, color, model)) {
        if lines[pos].quantity <= 1 {
            lines.remove(pos);
        } else {
            lines[pos].quantity -= 1;
        }
    }
}

pub(crate) fn remove_line(lines: &mut Vec<CartLine>, slug: &str, color: &str, model: &str) {
    lines.retain(|l| !l.same_identity(slug, color, model));
}

#[derive(Clone, Copy)]
pub struct CartStore {
    pub lines: RwSignal<Vec<CartLine>>,
}

impl CartStore {
    pub fn load() -> Self {
        let lines = storage::get_raw(STORAGE_KEY)
            .and_then(|raw| storage::decode_envelope::<Vec<CartLine>>(&raw, STORAGE_VERSION))
            .unwrap_or_default();
        Self {
            lines: RwSignal::new(lines),
        }
    }

    pub fn add(&self, item: CartLine) {
        self.lines.update(|lines| add_line(lines, item));
        self.persist();
    }

    pub fn increase(&self, slug: &str, color: &str, model: &str) {
        self.lines
            .update(|lines| increase_line(lines, slug, color, model));
        self.persist();
    }

    pub fn decrease(&self, slug: &str, color: &str, model: &str) {
        self.lines
            .update(|lines| decrease_line(lines, slug, color, model));
        self.persist();
    }

    pub fn remove(&self, slug: &str, color: &str, model: &str) {
        self.lines
            .update(|lines| remove_line(lines, slug, color, model));
        self.persist();
    }

    pub fn total_items(&self) -> u32 {
        self.lines
            .with(|lines| lines.iter().map(|l| l.quantity).sum())
    }

    // read-modify-write with no await in between: the mutation above and
    // this serialization happen in the same synchronous task
    fn persist(&self) {
        let raw = self
            .lines
            .with_untracked(|lines| storage::encode_envelope(lines, STORAGE_VERSION));
        if let Some(raw) = raw {
            storage::set_raw(STORAGE_KEY, &raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(slug: &str, color: &str, model: &str) -> CartLine {
        CartLine {
            id: 1,
            slug: slug.to_string(),
            name: slug.to_string(),
            image: String::new(),
            price: "1 000,00 ₽".into(),
            categories: vec![],
            selected_color: color.to_string(),
            selected_model: model.to_string(),
            quantity: 1,
        }
    }

    #[test]
    fn test_add_same_identity_merges() {
        let mut lines = Vec::new();
        add_line(&mut lines, line("tote", "black", "large"));
        add_line(&mut lines, line("tote", "black", "large"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn test_different_identity_is_a_new_line() {
        let mut lines = Vec::new();
        add_line(&mut lines, line("tote", "black", "large"));
        add_line(&mut lines, line("tote", "brown", "large"));
        add_line(&mut lines, line("tote", "black", "small"));
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.quantity == 1));
    }

    #[test]
    fn test_decrease_to_zero_removes_line() {
        let mut lines = Vec::new();
        add_line(&mut lines, line("tote", "black", "large"));
        add_line(&mut lines, line("tote", "black", "large"));

        decrease_line(&mut lines, "tote", "black", "large");
        assert_eq!(lines[0].quantity, 1);
        decrease_line(&mut lines, "tote", "black", "large");
        assert!(lines.is_empty());
        // no-op on a missing identity
        decrease_line(&mut lines, "tote", "black", "large");
        assert!(lines.is_empty());
    }

    #[test]
    fn test_increase_and_remove() {
        let mut lines = Vec::new();
        add_line(&mut lines, line("tote", "black", "large"));
        increase_line(&mut lines, "tote", "black", "large");
        assert_eq!(lines[0].quantity, 2);

        remove_line(&mut lines, "tote", "black", "large");
        assert!(lines.is_empty());
    }

    #[test]
    fn test_persistence_round_trip() {
        let mut lines = Vec::new();
        add_line(&mut lines, line("tote", "black", "large"));
        add_line(&mut lines, line("clutch", "red", ""));
        add_line(&mut lines, line("tote", "black", "large"));

        let raw = storage::encode_envelope(&lines, STORAGE_VERSION).unwrap();
        let back: Vec<CartLine> = storage::decode_envelope(&raw, STORAGE_VERSION).unwrap();
        assert_eq!(back, lines);
    }

    #[test]
    fn test_storage_wire_shape() {
        let mut lines = Vec::new();
        add_line(&mut lines, line("tote", "black", "large"));
        let raw = storage::encode_envelope(&lines, STORAGE_VERSION).unwrap();
        assert!(raw.contains("\"version\":1"));
        assert!(raw.contains("\"selectedColor\":\"black\""));
        assert!(raw.contains("\"selectedModel\":\"large\""));
    }

    #[test]
    fn test_legacy_bare_array_migrates() {
        let legacy = serde_json::to_string(&vec![line("tote", "", "")]).unwrap();
        let back: Vec<CartLine> = storage::decode_envelope(&legacy, STORAGE_VERSION).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].slug, "tote");
    }
}
