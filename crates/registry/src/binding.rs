//! Per-key reactive cells.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use prefs_store::KeyValueStore;
use prefs_wire::{Codec, WireKind, WireValue};
use prefs_worker::{TaskClass, WorkerJoinSet};
use tokio::sync::watch;

use crate::entry::{PrefValue, PreferenceEntry};
use crate::writer::WriteQueue;
use crate::{PrefError, Result};


/// Shared wiring handed to entries while a registry is being built.
#[doc(hidden)]
pub struct BindContext {
	pub(crate) store: Arc<dyn KeyValueStore>,
	pub(crate) writes: WriteQueue,
	pub(crate) forwarders: WorkerJoinSet<()>,
	/// Counts bindings that have published the store's initial value.
	pub(crate) synced: Arc<watch::Sender<usize>>,
}

/// Live view of one preference.
///
/// The current value is always available through [`Binding::get`] and starts out
/// as the registered default. It tracks the store: once the store commits a
/// value for the key, the binding decodes it and re-emits; absent or
/// undecodable values resolve to the default.
///
/// Bindings are cheap handles. Cloning shares the same cell, and a binding
/// stays readable after its registry is gone, frozen at its last value.
pub struct Binding<T> {
	inner: Arc<Inner<T>>,
}

struct Inner<T> {
	key: String,
	default: T,
	codec: Arc<dyn Codec<T>>,
	current: watch::Receiver<T>,
	writes: WriteQueue,
}

impl<T> Clone for Binding<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> fmt::Debug for Binding<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("key", &self.inner.key)
			.field("type", &std::any::type_name::<T>())
			.finish()
	}
}

impl<T: PrefValue> Binding<T> {
	pub fn key(&self) -> &str {
		&self.inner.key
	}

	pub fn default_value(&self) -> &T {
		&self.inner.default
	}

	/// Returns the current value.
	pub fn get(&self) -> T {
		self.inner.current.borrow().clone()
	}

	/// Returns a receiver that replays the current value and sees every change.
	pub fn subscribe(&self) -> watch::Receiver<T> {
		self.inner.current.clone()
	}

	/// Schedules a write of `value` and returns immediately.
	///
	/// The new value shows up in [`Binding::get`] and subscribers only after the
	/// store has committed it. The write is carried out even if every handle to
	/// this binding is dropped in the meantime.
	pub fn update(&self, value: T) {
		match self.inner.codec.encode(&value) {
			Ok(wire) => self.inner.writes.submit(&self.inner.key, Some(wire)),
			Err(error) => {
				tracing::error!(key = %self.inner.key, %error, "failed to encode preference value, write dropped");
			}
		}
	}

	/// Schedules removal of the stored value, reverting the binding to its default.
	pub fn reset(&self) {
		self.inner.writes.submit(&self.inner.key, None);
	}
}

/// Operations available on a binding without knowing its value type.
///
/// Values cross this interface in wire form, encoded with the binding's codec.
pub trait DynBinding: Send + Sync {
	fn key(&self) -> &str;

	/// Name of the Rust value type the binding was registered with.
	fn type_name(&self) -> &'static str;

	/// Wire variant the binding's codec produces.
	fn wire_kind(&self) -> WireKind;

	/// Current value in wire form.
	fn current_wire(&self) -> Option<WireValue>;

	/// Default value in wire form.
	fn default_wire(&self) -> Option<WireValue>;

	/// Decodes `wire` with the binding's codec and schedules it as an update.
	fn update_wire(&self, wire: WireValue) -> Result<()>;

	/// Same as [`Binding::reset`].
	fn reset(&self);

	#[doc(hidden)]
	fn as_any(&self) -> &dyn Any;
}

impl<T: PrefValue> DynBinding for Binding<T> {
	fn key(&self) -> &str {
		&self.inner.key
	}

	fn type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}

	fn wire_kind(&self) -> WireKind {
		self.inner.codec.wire_kind()
	}

	fn current_wire(&self) -> Option<WireValue> {
		self.inner.codec.encode(&self.get()).ok()
	}

	fn default_wire(&self) -> Option<WireValue> {
		self.inner.codec.encode(&self.inner.default).ok()
	}

	fn update_wire(&self, wire: WireValue) -> Result<()> {
		let value = self.inner.codec.decode(&wire).map_err(|source| PrefError::InvalidValue {
			key: self.inner.key.clone(),
			source,
		})?;
		self.update(value);
		Ok(())
	}

	fn reset(&self) {
		Binding::reset(self);
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// Creates the binding for `entry` and starts following the store.
pub(crate) fn bind<T: PrefValue>(entry: PreferenceEntry<T>, ctx: &mut BindContext) -> Binding<T> {
	let PreferenceEntry { key, default, codec } = entry;
	let (sink, current) = watch::channel(default.clone());
	let source = ctx.store.observe(&key);

	let synced = Arc::clone(&ctx.synced);
	ctx.forwarders.spawn(forward(key.clone(), default.clone(), Arc::clone(&codec), source, sink, synced));
	tracing::debug!(key = %key, value_type = std::any::type_name::<T>(), "preference bound");

	Binding {
		inner: Arc::new(Inner {
			key,
			default,
			codec,
			current,
			writes: ctx.writes.clone(),
		}),
	}
}

/// Republishes every committed store value for `key` as a decoded `T`.
async fn forward<T: PrefValue>(
	key: String,
	default: T,
	codec: Arc<dyn Codec<T>>,
	mut source: watch::Receiver<Option<WireValue>>,
	sink: watch::Sender<T>,
	synced: Arc<watch::Sender<usize>>,
) {
	let mut first = true;
	loop {
		let next = {
			let wire = source.borrow_and_update();
			resolve(&key, &default, codec.as_ref(), (*wire).as_ref())
		};
		sink.send_if_modified(|current| {
			if unchanged(current, &next) {
				return false;
			}
			*current = next;
			true
		});
		if first {
			first = false;
			synced.send_modify(|n| *n += 1);
		}
		if source.changed().await.is_err() {
			break;
		}
	}
	tracing::trace!(key = %key, "preference source closed");
}

/// Equality that also treats two self-unequal values (NaN) as the same value.
#[allow(clippy::eq_op)]
fn unchanged<T: PartialEq>(current: &T, next: &T) -> bool {
	current == next || (current != current && next != next)
}

fn resolve<T: PrefValue>(key: &str, default: &T, codec: &dyn Codec<T>, wire: Option<&WireValue>) -> T {
	let Some(wire) = wire else {
		return default.clone();
	};
	match codec.decode(wire) {
		Ok(value) => value,
		Err(error) => {
			tracing::warn!(key, stored = %wire, %error, "undecodable preference value, using default");
			default.clone()
		}
	}
}

impl BindContext {
	pub(crate) fn new(store: Arc<dyn KeyValueStore>, writes: WriteQueue) -> Self {
		Self {
			store,
			writes,
			forwarders: WorkerJoinSet::new(TaskClass::Interactive),
			synced: Arc::new(watch::channel(0).0),
		}
	}
}
