//! Property-based tests using proptest.

use proptest::prelude::*;
use setkit::settings::normalize_keys;
use setkit::{Builder, FnBuilder, SettingsMap, SettingsStore};
use toml::Value;

fn doubling_builder() -> FnBuilder<fn(i64) -> Result<i64, String>, i64> {
    fn double(n: i64) -> Result<i64, String> {
        n.checked_mul(2).ok_or_else(|| format!("{n} overflows"))
    }
    FnBuilder::new(double as fn(i64) -> Result<i64, String>)
}

// Every key comes out lower-cased and maps to a value that was stored under
// one of its spellings.
proptest! {
    #[test]
    fn test_normalized_keys_are_lowercase(
        entries in prop::collection::btree_map("[A-Za-z_]{1,8}", any::<i64>(), 0..16)
    ) {
        let settings: SettingsMap = entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::Integer(*v)))
            .collect();

        let normalized = normalize_keys(settings);

        for key in normalized.keys() {
            let lower = key.to_lowercase();
            prop_assert_eq!(key, &lower);
        }
        for (key, value) in &entries {
            let stored = normalized[&key.to_lowercase()].as_integer().unwrap();
            let candidates: Vec<i64> = entries
                .iter()
                .filter(|(k, _)| k.to_lowercase() == key.to_lowercase())
                .map(|(_, v)| *v)
                .collect();
            prop_assert!(candidates.contains(&stored));
            if candidates.len() == 1 {
                prop_assert_eq!(stored, *value);
            }
        }
    }
}

// Collisions resolve to the last spelling in iteration order.
proptest! {
    #[test]
    fn test_collision_last_write_wins(word in "[a-z]{1,8}", upper in any::<i64>(), lower in any::<i64>()) {
        let mut settings = SettingsMap::new();
        settings.insert(word.to_uppercase(), Value::Integer(upper));
        settings.insert(word.clone(), Value::Integer(lower));

        let normalized = normalize_keys(settings);

        prop_assert_eq!(normalized.len(), 1);
        prop_assert_eq!(normalized[&word].as_integer(), Some(lower));
    }
}

proptest! {
    #[test]
    fn test_build_and_get_equals_build_then_get(n in -1_000_000i64..1_000_000) {
        let mut composed = doubling_builder();
        let mut stepwise = doubling_builder();

        let via_composed = composed.build_and_get(n).unwrap().copied();
        stepwise.build(n).unwrap();

        prop_assert_eq!(via_composed, stepwise.get().copied());
        prop_assert_eq!(composed.result(), stepwise.result());
    }
}

proptest! {
    #[test]
    fn test_rebuild_reflects_only_latest_input(first in any::<i32>(), second in any::<i32>()) {
        let mut builder = doubling_builder();

        builder.build(i64::from(first)).unwrap();
        builder.build(i64::from(second)).unwrap();

        prop_assert_eq!(builder.get().copied(), Some(i64::from(second) * 2));
    }
}

proptest! {
    #[test]
    fn test_store_returns_last_set(values in prop::collection::vec(any::<u32>(), 1..32)) {
        let store = SettingsStore::new();
        for value in &values {
            store.set(*value);
            let current = store.get();
            prop_assert_eq!(current.as_deref(), Some(value));
        }
    }
}
