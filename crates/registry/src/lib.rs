//! Reactive preference bindings over a persistent key-value store.
//!
//! An application declares its preferences once, as `(key, default, codec)`
//! entries, and builds a [`Registry`] from them. Each entry becomes a
//! [`Binding`]: a cell whose current value is always available, which follows
//! the store through a `watch` channel, and whose [`Binding::update`] schedules a
//! background write without waiting for it.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use prefs_registry::{PrefKey, Registry};
//! use prefs_store::MemoryStore;
//!
//! const VOLUME: PrefKey<i32> = PrefKey::new("volume");
//!
//! # async fn demo() -> Result<(), prefs_registry::PrefError> {
//! let registry = Registry::builder(Arc::new(MemoryStore::new()))
//! 	.native(VOLUME.name(), 5)
//! 	.native("enabled", false)
//! 	.build()?;
//!
//! let volume = registry.get(VOLUME)?;
//! assert_eq!(volume.get(), 5);
//! volume.update(8);
//! volume.subscribe().wait_for(|v| *v == 8).await.ok();
//! # Ok(())
//! # }
//! ```
//!
//! # Failure handling
//!
//! Reads never fail: a missing or undecodable stored value yields the entry's
//! default. Writes never report back to the caller of `update`; failures are
//! logged and published on [`Registry::write_failures`].

mod binding;
mod entry;
mod error;
mod key;
mod registry;
mod writer;

#[doc(hidden)]
pub use binding::BindContext;
pub use binding::{Binding, DynBinding};
pub use entry::{PrefValue, PreferenceEntry, RegisterEntry};
pub use error::{PrefError, Result};
pub use key::PrefKey;
pub use prefs_worker::RetryPolicy;
pub use registry::{Registry, RegistryBuilder};
pub use writer::WriteFailure;
