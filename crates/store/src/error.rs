//! Error types for store access.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing a store.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The store refused the operation.
	#[error("store unavailable: {0}")]
	Unavailable(String),

	/// Error reading or writing the backing file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path of the backing file.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The backing file is not a store document.
	#[error("corrupt store file {path}: {reason}")]
	Corrupt { path: PathBuf, reason: String },

	/// The value has no representation in the backing file.
	#[error("cannot persist {value} at '{key}': JSON has no non-finite numbers")]
	NonFinite { key: String, value: String },

	/// Store contents could not be encoded.
	#[error("failed to encode store contents: {0}")]
	Encode(#[from] serde_json::Error),

	/// The blocking persistence task did not complete.
	#[error("persistence task failed: {0}")]
	Task(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
