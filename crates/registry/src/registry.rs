//! Session-scoped key to binding map.

use std::sync::Arc;

use prefs_store::KeyValueStore;
use prefs_wire::{Codec, NativeValue, WireValue};
use prefs_worker::{RetryPolicy, WorkerJoinSet};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, watch};

use crate::binding::{BindContext, Binding, DynBinding};
use crate::entry::{PrefValue, PreferenceEntry, RegisterEntry};
use crate::writer::{WriteFailure, WriteQueue};
use crate::{PrefError, PrefKey, Result};

#[cfg(test)]
mod tests;

const FAILURE_CHANNEL_CAPACITY: usize = 64;

/// Collects preference declarations and produces a [`Registry`].
///
/// The builder is consumed by [`RegistryBuilder::build`]; a built registry is
/// immutable, so every preference of a session must be declared up front.
pub struct RegistryBuilder {
	store: Arc<dyn KeyValueStore>,
	retry: RetryPolicy,
	entries: Vec<Box<dyn RegisterEntry>>,
}

impl RegistryBuilder {
	pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
		Self {
			store,
			retry: RetryPolicy::none(),
			entries: Vec::new(),
		}
	}

	/// Sets the retry policy applied to every background write.
	pub fn retry(mut self, policy: RetryPolicy) -> Self {
		self.retry = policy;
		self
	}

	/// Adds one declaration.
	pub fn entry<T: PrefValue>(mut self, entry: PreferenceEntry<T>) -> Self {
		self.entries.push(Box::new(entry));
		self
	}

	/// Adds a preference of a natively stored type.
	pub fn native<T: PrefValue + NativeValue>(self, key: impl Into<String>, default: T) -> Self {
		self.entry(PreferenceEntry::native(key, default))
	}

	/// Adds a preference stored as JSON.
	pub fn json<T: PrefValue + Serialize + DeserializeOwned>(self, key: impl Into<String>, default: T) -> Self {
		self.entry(PreferenceEntry::json(key, default))
	}

	/// Adds a preference stored through an explicit codec.
	pub fn codec<T: PrefValue>(self, key: impl Into<String>, default: T, codec: impl Codec<T>) -> Self {
		self.entry(PreferenceEntry::new(key, default, codec))
	}

	/// Adds a list of type-erased declarations, in order.
	pub fn register<I>(mut self, entries: I) -> Self
	where
		I: IntoIterator<Item = Box<dyn RegisterEntry>>,
	{
		self.entries.extend(entries);
		self
	}

	/// Validates every declaration and binds it to the store.
	///
	/// Fails on the first duplicate key or on a default its codec cannot encode;
	/// nothing is bound in that case.
	pub fn build(self) -> Result<Registry> {
		let mut seen = FxHashSet::default();
		for entry in &self.entries {
			if !seen.insert(entry.key()) {
				return Err(PrefError::DuplicateKey(entry.key().to_string()));
			}
			entry.validate()?;
		}

		let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
		let writes = WriteQueue::start(Arc::clone(&self.store), self.retry, failures.clone());
		let mut ctx = BindContext::new(Arc::clone(&self.store), writes.clone());

		let mut slots = FxHashMap::default();
		slots.reserve(self.entries.len());
		for entry in self.entries {
			let key = entry.key().to_string();
			slots.insert(key, entry.bind(&mut ctx));
		}

		tracing::info!(preferences = slots.len(), retry_attempts = self.retry.max_attempts(), "preference registry built");

		Ok(Registry {
			slots,
			store: self.store,
			writes,
			failures,
			synced: ctx.synced.subscribe(),
			_synced_tx: ctx.synced,
			_forwarders: ctx.forwarders,
		})
	}
}

/// Map from key to [`Binding`] for one session.
///
/// Lookups are strict: unknown keys and wrong value types are errors, never a
/// silently created binding. Dropping the registry stops store observation;
/// writes already queued still complete.
pub struct Registry {
	slots: FxHashMap<String, Arc<dyn DynBinding>>,
	store: Arc<dyn KeyValueStore>,
	writes: WriteQueue,
	failures: broadcast::Sender<WriteFailure>,
	synced: watch::Receiver<usize>,
	_synced_tx: Arc<watch::Sender<usize>>,
	_forwarders: WorkerJoinSet<()>,
}

impl Registry {
	/// Starts declaring a registry backed by `store`.
	pub fn builder(store: Arc<dyn KeyValueStore>) -> RegistryBuilder {
		RegistryBuilder::new(store)
	}

	/// Returns the binding registered under `key` as a `Binding<T>`.
	pub fn lookup<T: PrefValue>(&self, key: &str) -> Result<Binding<T>> {
		let slot = self.slot(key)?;
		slot.as_any()
			.downcast_ref::<Binding<T>>()
			.cloned()
			.ok_or_else(|| PrefError::TypeMismatch {
				key: key.to_string(),
				expected: std::any::type_name::<T>(),
				registered: slot.type_name(),
			})
	}

	/// Typed-key form of [`Registry::lookup`].
	pub fn get<T: PrefValue>(&self, key: PrefKey<T>) -> Result<Binding<T>> {
		self.lookup(key.name())
	}

	/// Returns the binding under `key` without fixing its value type.
	pub fn dynamic(&self, key: &str) -> Result<Arc<dyn DynBinding>> {
		self.slot(key).map(Arc::clone)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.slots.contains_key(key)
	}

	/// Returns every registered key, sorted.
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<_> = self.slots.keys().map(String::as_str).collect();
		keys.sort_unstable();
		keys
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Current value of every preference in wire form, sorted by key.
	pub fn snapshot(&self) -> Vec<(String, Option<WireValue>)> {
		self.keys()
			.into_iter()
			.map(|key| (key.to_string(), self.slots[key].current_wire()))
			.collect()
	}

	/// Waits until every binding reflects what the store held when the registry
	/// was built.
	///
	/// Bindings start at their defaults and pick up stored values
	/// asynchronously; one-shot readers that need stored values call this first.
	pub async fn ready(&self) {
		let mut synced = self.synced.clone();
		let expected = self.slots.len();
		let _ = synced.wait_for(|n| *n >= expected).await;
	}

	/// Waits until every write submitted so far has been attempted.
	pub async fn flush(&self) {
		self.writes.flush().await;
	}

	/// Subscribes to writes that failed for good.
	pub fn write_failures(&self) -> broadcast::Receiver<WriteFailure> {
		self.failures.subscribe()
	}

	/// Returns the backing store.
	pub fn store(&self) -> &Arc<dyn KeyValueStore> {
		&self.store
	}

	fn slot(&self, key: &str) -> Result<&Arc<dyn DynBinding>> {
		self.slots.get(key).ok_or_else(|| PrefError::UnknownKey(key.to_string()))
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry").field("keys", &self.keys()).finish_non_exhaustive()
	}
}
