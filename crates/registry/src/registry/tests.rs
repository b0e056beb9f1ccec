use std::collections::BTreeMap;
use std::time::Duration;

use prefs_store::MemoryStore;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

use super::*;

const ENABLED: PrefKey<bool> = PrefKey::new("enabled");
const NAME: PrefKey<String> = PrefKey::new("name");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Theme {
	Light,
	Dark,
}

async fn settled<T: PrefValue>(binding: &Binding<T>, expected: T) {
	let mut rx = binding.subscribe();
	tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|v| *v == expected))
		.await
		.expect("binding did not settle in time")
		.expect("binding source closed");
}

fn registry_with(store: Arc<MemoryStore>) -> Registry {
	Registry::builder(store)
		.native("volume", 5i32)
		.native(ENABLED.name(), false)
		.native(NAME.name(), "x".to_string())
		.json("theme", Theme::Light)
		.build()
		.unwrap()
}

#[tokio::test]
async fn defaults_before_any_emission() {
	let registry = registry_with(Arc::new(MemoryStore::new()));

	assert_eq!(registry.lookup::<i32>("volume").unwrap().get(), 5);
	assert!(!registry.get(ENABLED).unwrap().get());
	assert_eq!(registry.get(NAME).unwrap().get(), "x");
	assert_eq!(registry.lookup::<Theme>("theme").unwrap().get(), Theme::Light);
}

#[tokio::test]
async fn unknown_key_fails() {
	let registry = registry_with(Arc::new(MemoryStore::new()));

	assert!(matches!(registry.lookup::<i32>("nonexistent"), Err(PrefError::UnknownKey(k)) if k == "nonexistent"));
	assert!(matches!(registry.dynamic("nonexistent"), Err(PrefError::UnknownKey(_))));
	assert!(!registry.contains("nonexistent"));
}

#[tokio::test]
async fn wrong_type_is_reported() {
	let registry = registry_with(Arc::new(MemoryStore::new()));

	let err = registry.lookup::<String>("volume").unwrap_err();
	match err {
		PrefError::TypeMismatch { key, expected, registered } => {
			assert_eq!(key, "volume");
			assert_eq!(expected, "alloc::string::String");
			assert_eq!(registered, "i32");
		}
		other => panic!("expected type mismatch, got {other:?}"),
	}
}

#[tokio::test]
async fn duplicate_keys_are_rejected() {
	let result = Registry::builder(Arc::new(MemoryStore::new()))
		.native("volume", 5i32)
		.native("volume", 7i64)
		.build();

	assert!(matches!(result, Err(PrefError::DuplicateKey(k)) if k == "volume"));
}

#[tokio::test]
async fn unencodable_default_is_unsupported() {
	let mut grid = BTreeMap::new();
	grid.insert((0u8, 0u8), 1u8);

	let result = Registry::builder(Arc::new(MemoryStore::new())).json("grid", grid).build();

	assert!(matches!(result, Err(PrefError::UnsupportedType { key, .. }) if key == "grid"));
}

#[tokio::test]
async fn volume_scenario() {
	let store = Arc::new(MemoryStore::new());
	let registry = registry_with(Arc::clone(&store));
	let volume = registry.lookup::<i32>("volume").unwrap();
	assert_eq!(volume.get(), 5);

	volume.update(8);
	settled(&volume, 8).await;

	store.inject("volume", Some(WireValue::String("loud".into())));
	settled(&volume, 5).await;
}

#[tokio::test]
async fn bindings_are_independent() {
	let registry = registry_with(Arc::new(MemoryStore::new()));
	let enabled = registry.get(ENABLED).unwrap();
	let name = registry.get(NAME).unwrap();

	enabled.update(true);
	name.update("y".to_string());
	settled(&enabled, true).await;
	settled(&name, "y".to_string()).await;

	enabled.update(false);
	settled(&enabled, false).await;
	assert_eq!(name.get(), "y");
}

#[tokio::test]
async fn last_write_wins() {
	let store = Arc::new(MemoryStore::new());
	let registry = registry_with(Arc::clone(&store));
	let volume = registry.lookup::<i32>("volume").unwrap();
	let same = registry.lookup::<i32>("volume").unwrap();

	volume.update(3);
	same.update(9);
	registry.flush().await;

	settled(&volume, 9).await;
	assert_eq!(store.get("volume"), Some(WireValue::Int(9)));
}

#[tokio::test]
async fn store_values_present_at_build_are_picked_up() {
	let store = Arc::new(MemoryStore::with_entries([("volume", WireValue::Int(2))]));
	let registry = registry_with(store);
	registry.ready().await;

	assert_eq!(registry.lookup::<i32>("volume").unwrap().get(), 2);
	assert_eq!(registry.lookup::<Theme>("theme").unwrap().get(), Theme::Light);
}

#[tokio::test]
async fn snapshot_lists_every_key_in_wire_form() {
	let registry = registry_with(Arc::new(MemoryStore::new()));

	assert_eq!(registry.keys(), vec!["enabled", "name", "theme", "volume"]);
	assert_eq!(
		registry.snapshot(),
		vec![
			("enabled".to_string(), Some(WireValue::Bool(false))),
			("name".to_string(), Some(WireValue::String("x".into()))),
			("theme".to_string(), Some(WireValue::String("\"Light\"".into()))),
			("volume".to_string(), Some(WireValue::Int(5))),
		]
	);
}

#[tokio::test]
async fn register_accepts_erased_entries() {
	let entries: Vec<Box<dyn RegisterEntry>> = vec![
		PreferenceEntry::native("volume", 5i32).into(),
		PreferenceEntry::json("theme", Theme::Dark).into(),
	];
	let registry = Registry::builder(Arc::new(MemoryStore::new())).register(entries).build().unwrap();

	assert_eq!(registry.len(), 2);
	assert_eq!(registry.lookup::<Theme>("theme").unwrap().get(), Theme::Dark);
}

#[tokio::test]
async fn dynamic_binding_updates_from_wire() {
	let registry = registry_with(Arc::new(MemoryStore::new()));
	let theme = registry.dynamic("theme").unwrap();

	assert!(matches!(
		theme.update_wire(WireValue::String("Purple".into())),
		Err(PrefError::InvalidValue { .. })
	));
	theme.update_wire(WireValue::String("\"Dark\"".into())).unwrap();

	settled(&registry.lookup::<Theme>("theme").unwrap(), Theme::Dark).await;
}
