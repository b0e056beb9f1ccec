//! Error types for configuration loading.

use std::path::PathBuf;

use prefs_registry::PrefError;
use prefs_store::StoreError;
use thiserror::Error;

/// Errors that can occur when loading configuration or building from it.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or structure.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A declared default does not fit the declared type.
	#[error("invalid default for preference '{key}' of type {kind}: {reason}")]
	InvalidDefault { key: String, kind: String, reason: String },

	/// No platform directory to place the store or config in.
	#[error("no {0} directory available on this platform")]
	NoPlatformDir(&'static str),

	/// The declared preferences could not be turned into a registry.
	#[error(transparent)]
	Registry(#[from] PrefError),

	/// The configured store could not be opened.
	#[error(transparent)]
	Store(#[from] StoreError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
