use prefs_wire::CodecError;
use thiserror::Error;

/// Errors raised while building a registry or looking up bindings.
#[derive(Debug, Error)]
pub enum PrefError {
	/// No preference is registered under this key.
	#[error("unknown preference key: {0}")]
	UnknownKey(String),

	/// The key exists but was registered with a different value type.
	#[error("preference '{key}' is registered as {registered}, not {expected}")]
	TypeMismatch {
		key: String,
		expected: &'static str,
		registered: &'static str,
	},

	/// Two entries share a key.
	#[error("preference '{0}' is registered more than once")]
	DuplicateKey(String),

	/// The entry's value type cannot be stored.
	#[error("preference '{key}' has unsupported type {type_name}: {reason}")]
	UnsupportedType {
		key: String,
		type_name: String,
		reason: String,
	},

	/// A wire value handed to a binding could not be decoded.
	#[error("invalid value for preference '{key}': {source}")]
	InvalidValue {
		key: String,
		#[source]
		source: CodecError,
	},
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, PrefError>;
