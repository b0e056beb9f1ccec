//! Configuration for preference registries.
//!
//! Configuration is written in TOML and covers three things: which store backs
//! the registry, how background writes are retried, and (optionally) the
//! preferences themselves, declared as data instead of code.
//!
//! # Configuration Files
//!
//! Looked up at `$XDG_CONFIG_HOME/prefs/config.toml` (or the platform
//! equivalent) unless a path is given explicitly. Every section is optional.
//!
//! ```toml
//! [store]
//! backend = "file"            # or "memory"
//! path = "/tmp/prefs.json"    # default: <data dir>/prefs/store.json
//!
//! [writes]
//! max_attempts = 3
//! initial_backoff_ms = 50
//! max_backoff_ms = 2000
//!
//! [[preference]]
//! key = "volume"
//! type = "int"
//! default = 5
//!
//! [[preference]]
//! key = "languages"
//! type = "string_set"
//! default = ["en"]
//! ```

mod decl;
mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub use decl::PreferenceDecl;
pub use error::{ConfigError, Result};
use prefs_registry::{RegisterEntry, Registry, RegistryBuilder, RetryPolicy};
use prefs_store::{FileStore, KeyValueStore, MemoryStore};
use serde::Deserialize;


const APP_DIR: &str = "prefs";

/// Parsed configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefsConfig {
	#[serde(default)]
	pub store: StoreConfig,
	#[serde(default)]
	pub writes: WritesConfig,
	#[serde(default, rename = "preference")]
	pub preferences: Vec<PreferenceDecl>,
}

/// Which store implementation to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
	#[default]
	File,
	Memory,
}

/// `[store]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
	#[serde(default)]
	pub backend: StoreBackend,
	/// Store file for the `file` backend.
	pub path: Option<PathBuf>,
}

/// `[writes]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WritesConfig {
	/// Total attempts per write, including the first.
	pub max_attempts: u32,
	pub initial_backoff_ms: u64,
	pub max_backoff_ms: u64,
}

impl Default for WritesConfig {
	fn default() -> Self {
		Self {
			max_attempts: 1,
			initial_backoff_ms: 50,
			max_backoff_ms: 2000,
		}
	}
}

impl PrefsConfig {
	/// Default configuration file location.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
	}

	/// Parses configuration from TOML text.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Loads configuration from `path`.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&text)?;
		tracing::debug!(path = %path.display(), preferences = config.preferences.len(), "configuration loaded");
		Ok(config)
	}

	/// Loads configuration from `path`, falling back to defaults when the file
	/// does not exist.
	pub fn load_or_default(path: &Path) -> Result<Self> {
		if path.exists() {
			Self::load(path)
		} else {
			tracing::info!(path = %path.display(), "no configuration file, using defaults");
			Ok(Self::default())
		}
	}

	/// Store file used by the `file` backend.
	pub fn store_path(&self) -> Result<PathBuf> {
		if let Some(path) = &self.store.path {
			return Ok(path.clone());
		}
		dirs::data_dir()
			.map(|dir| dir.join(APP_DIR).join("store.json"))
			.ok_or(ConfigError::NoPlatformDir("data"))
	}

	/// Opens the configured store.
	pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>> {
		let store: Arc<dyn KeyValueStore> = match self.store.backend {
			StoreBackend::Memory => Arc::new(MemoryStore::new()),
			StoreBackend::File => Arc::new(FileStore::open(self.store_path()?)?),
		};
		Ok(store)
	}

	/// Retry policy for background writes.
	pub fn retry_policy(&self) -> RetryPolicy {
		let writes = &self.writes;
		if writes.max_attempts <= 1 {
			return RetryPolicy::none();
		}
		RetryPolicy::exponential(
			writes.max_attempts,
			Duration::from_millis(writes.initial_backoff_ms),
			Duration::from_millis(writes.max_backoff_ms),
		)
	}

	/// Registry entries for every `[[preference]]`, in declaration order.
	pub fn entries(&self) -> Result<Vec<Box<dyn RegisterEntry>>> {
		self.preferences.iter().map(PreferenceDecl::to_entry).collect()
	}

	/// A builder over `store` holding the declared preferences and retry policy.
	///
	/// More entries can be added in code before building.
	pub fn registry_builder(&self, store: Arc<dyn KeyValueStore>) -> Result<RegistryBuilder> {
		Ok(Registry::builder(store).retry(self.retry_policy()).register(self.entries()?))
	}

	/// Opens the store and builds a registry from the declared preferences.
	pub fn build_registry(&self) -> Result<Registry> {
		Ok(self.registry_builder(self.open_store()?)?.build()?)
	}
}
