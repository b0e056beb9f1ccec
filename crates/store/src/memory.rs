use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use prefs_wire::WireValue;
use rustc_hash::FxHashMap;
use tokio::sync::watch;

use crate::{KeyValueStore, Result, StoreError};


/// In-process store with one `watch` channel per key.
#[derive(Debug, Default)]
pub struct MemoryStore {
	slots: RwLock<FxHashMap<String, watch::Sender<Option<WireValue>>>>,
	write_faults: AtomicUsize,
}

impl MemoryStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store pre-filled with `entries`.
	pub fn with_entries<I, K>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, WireValue)>,
		K: Into<String>,
	{
		let store = Self::new();
		for (key, value) in entries {
			store.apply(&key.into(), Some(value));
		}
		store
	}

	/// Places `value` at `key` as another writer would, bypassing fault injection.
	///
	/// Used to simulate foreign or corrupted data appearing in the store.
	pub fn inject(&self, key: &str, value: Option<WireValue>) {
		self.apply(key, value);
	}

	/// Makes the next `count` calls to [`KeyValueStore::write`] fail.
	pub fn fail_writes(&self, count: usize) {
		self.write_faults.store(count, Ordering::SeqCst);
	}

	/// Publishes `value` to observers of `key`.
	pub(crate) fn apply(&self, key: &str, value: Option<WireValue>) {
		let mut slots = self.slots.write();
		match slots.entry(key.to_string()) {
			Entry::Occupied(slot) => {
				slot.get().send_replace(value);
			}
			Entry::Vacant(slot) => {
				if value.is_some() {
					slot.insert(watch::channel(value).0);
				}
			}
		}
	}

	/// Returns every key with its current value, sorted by key.
	pub(crate) fn entries(&self) -> Vec<(String, WireValue)> {
		let slots = self.slots.read();
		let mut entries: Vec<_> = slots
			.iter()
			.filter_map(|(key, tx)| tx.borrow().clone().map(|value| (key.clone(), value)))
			.collect();
		entries.sort_by(|a, b| a.0.cmp(&b.0));
		entries
	}

	fn take_fault(&self) -> bool {
		self.write_faults
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
			.is_ok()
	}
}

#[async_trait]
impl KeyValueStore for MemoryStore {
	fn observe(&self, key: &str) -> watch::Receiver<Option<WireValue>> {
		if let Some(tx) = self.slots.read().get(key) {
			return tx.subscribe();
		}
		self.slots
			.write()
			.entry(key.to_string())
			.or_insert_with(|| watch::channel(None).0)
			.subscribe()
	}

	async fn write(&self, key: &str, value: Option<WireValue>) -> Result<()> {
		if self.take_fault() {
			return Err(StoreError::Unavailable(format!("injected write fault for '{key}'")));
		}
		self.apply(key, value);
		Ok(())
	}

	fn keys(&self) -> Vec<String> {
		self.entries().into_iter().map(|(key, _)| key).collect()
	}
}
