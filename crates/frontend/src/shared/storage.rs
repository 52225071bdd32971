//! localStorage helpers with a versioned JSON envelope.
//!
//! Persisted collections are wrapped in `{"version": N, "items": ...}` so a
//! future schema change can be detected instead of being silently
//! misparsed. A bare legacy value (written before the envelope existed) is
//! still accepted; anything else that fails to parse is treated as absent.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub fn get_raw(key: &str) -> Option<String> {
    storage()?.get_item(key).ok().flatten()
}

pub fn set_raw(key: &str, value: &str) {
    let Some(storage) = storage() else { return };
    let _ = storage.set_item(key, value);
}

#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    items: T,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    items: &'a T,
}

/// Decode a versioned envelope.
///
/// A version mismatch yields `None` (the caller falls back to its default),
/// a bare legacy value is migrated as-is.
pub fn decode_envelope<T: DeserializeOwned>(raw: &str, version: u32) -> Option<T> {
    if let Ok(envelope) = serde_json::from_str::<Envelope<T>>(raw) {
        if envelope.version == version {
            return Some(envelope.items);
        }
        return None;
    }
    serde_json::from_str::<T>(raw).ok()
}

pub fn encode_envelope<T: Serialize>(items: &T, version: u32) -> Option<String> {
    serde_json::to_string(&EnvelopeRef { version, items }).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_round_trip() {
        let items = vec![1i64, 2, 3];
        let raw = encode_envelope(&items, 1).unwrap();
        let back: Vec<i64> = decode_envelope(&raw, 1).unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn test_envelope_version_mismatch_discards() {
        let raw = encode_envelope(&vec![1i64], 1).unwrap();
        assert_eq!(decode_envelope::<Vec<i64>>(&raw, 2), None);
    }

    #[test]
    fn test_legacy_bare_value_migrates() {
        let back: Vec<i64> = decode_envelope("[4,5]", 1).unwrap();
        assert_eq!(back, vec![4, 5]);
    }

    #[test]
    fn test_malformed_is_none() {
        assert_eq!(decode_envelope::<Vec<i64>>("{not json", 1), None);
        assert_eq!(decode_envelope::<Vec<i64>>("\"nope\"", 1), None);
    }
}
