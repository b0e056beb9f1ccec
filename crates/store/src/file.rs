use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use prefs_wire::WireValue;
use prefs_worker::TaskClass;
use tokio::sync::{Mutex, watch};

use crate::{KeyValueStore, MemoryStore, Result, StoreError};


/// Store persisted as a single JSON document.
///
/// The document maps each key to a tagged wire value:
///
/// ```json
/// { "volume": { "type": "int", "value": 8 } }
/// ```
///
/// Writes are persisted one at a time in submission order and published to
/// observers only after the file has been replaced.
#[derive(Debug)]
pub struct FileStore {
	path: PathBuf,
	cache: MemoryStore,
	persist: Mutex<()>,
}

impl FileStore {
	/// Opens the store at `path`, loading any existing contents.
	///
	/// A missing file is an empty store. Entries that are not valid wire values
	/// are skipped with a warning; a document that is not a JSON object is
	/// rejected.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let cache = MemoryStore::new();

		match std::fs::read_to_string(&path) {
			Ok(text) => {
				for (key, value) in parse_document(&path, &text)? {
					cache.apply(&key, Some(value));
				}
			}
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "store file missing, starting empty");
			}
			Err(error) => return Err(StoreError::Io { path, error }),
		}

		Ok(Self {
			path,
			cache,
			persist: Mutex::new(()),
		})
	}

}

#[async_trait]
impl KeyValueStore for FileStore {
	fn observe(&self, key: &str) -> watch::Receiver<Option<WireValue>> {
		self.cache.observe(key)
	}

	async fn write(&self, key: &str, value: Option<WireValue>) -> Result<()> {
		if let Some(value) = &value
			&& !is_finite(value)
		{
			return Err(StoreError::NonFinite {
				key: key.to_string(),
				value: value.to_string(),
			});
		}

		let _persist = self.persist.lock().await;

		let mut document: BTreeMap<String, WireValue> = self.cache.entries().into_iter().collect();
		match &value {
			Some(value) => {
				document.insert(key.to_string(), value.clone());
			}
			None => {
				document.remove(key);
			}
		}

		let path = self.path.clone();
		prefs_worker::spawn_blocking(TaskClass::IoBlocking, move || persist_document(&path, &document))
			.await
			.map_err(|error| StoreError::Task(error.to_string()))??;

		self.cache.apply(key, value);
		Ok(())
	}

	fn keys(&self) -> Vec<String> {
		self.cache.keys()
	}
}

fn parse_document(path: &Path, text: &str) -> Result<Vec<(String, WireValue)>> {
	if text.trim().is_empty() {
		return Ok(Vec::new());
	}

	let root: serde_json::Value = serde_json::from_str(text).map_err(|error| StoreError::Corrupt {
		path: path.to_path_buf(),
		reason: error.to_string(),
	})?;
	let serde_json::Value::Object(map) = root else {
		return Err(StoreError::Corrupt {
			path: path.to_path_buf(),
			reason: "top-level value is not an object".to_string(),
		});
	};

	let mut entries = Vec::with_capacity(map.len());
	for (key, raw) in map {
		match serde_json::from_value::<WireValue>(raw) {
			Ok(value) => entries.push((key, value)),
			Err(error) => {
				tracing::warn!(path = %path.display(), key = %key, %error, "skipping unreadable store entry");
			}
		}
	}
	Ok(entries)
}

fn is_finite(value: &WireValue) -> bool {
	match value {
		WireValue::Float(v) => v.is_finite(),
		WireValue::Double(v) => v.is_finite(),
		_ => true,
	}
}

fn persist_document(path: &Path, document: &BTreeMap<String, WireValue>) -> Result<()> {
	let io_err = |error| StoreError::Io {
		path: path.to_path_buf(),
		error,
	};

	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		std::fs::create_dir_all(parent).map_err(io_err)?;
	}

	let text = serde_json::to_string_pretty(document)?;
	let tmp = path.with_extension("tmp");
	std::fs::write(&tmp, text).map_err(io_err)?;
	std::fs::rename(&tmp, path).map_err(io_err)?;
	tracing::trace!(path = %path.display(), entries = document.len(), "store persisted");
	Ok(())
}
