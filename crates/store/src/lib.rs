//! Observable key-value stores.
//!
//! A [`KeyValueStore`] holds one [`WireValue`] per key and lets any number of
//! observers follow a key through a `watch` channel. Writes are asynchronous and
//! become visible to observers once the store has committed them.
//!
//! Two stores ship with the crate:
//!
//! - [`MemoryStore`]: in-process only, with hooks for simulating foreign data
//!   and failing writes.
//! - [`FileStore`]: persists every committed write to a JSON file.

mod error;
mod file;
mod memory;

use async_trait::async_trait;
pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
use prefs_wire::WireValue;
use tokio::sync::watch;

/// Persistent, observable key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
	/// Follows the value at `key`.
	///
	/// The receiver's current value is what the store holds now (`None` when
	/// absent) and it is notified after every committed write to `key`. Calling
	/// `observe` again restarts observation from the current value.
	fn observe(&self, key: &str) -> watch::Receiver<Option<WireValue>>;

	/// Commits `value` at `key`, or removes the key when `value` is `None`.
	async fn write(&self, key: &str, value: Option<WireValue>) -> Result<()>;

	/// Returns the keys that currently hold a value, sorted.
	fn keys(&self) -> Vec<String>;

	/// Returns the value currently held at `key`.
	fn get(&self, key: &str) -> Option<WireValue> {
		self.observe(key).borrow().clone()
	}
}
