use thiserror::Error;

use crate::WireKind;

/// Errors produced while converting between typed values and wire values.
#[derive(Debug, Error)]
pub enum CodecError {
	/// The stored wire variant is not the one this codec reads.
	#[error("expected {expected} wire value, found {found}")]
	KindMismatch {
		/// Variant the codec expects.
		expected: WireKind,
		/// Variant actually present in the store.
		found: WireKind,
	},

	/// JSON payload could not be produced or parsed.
	#[error("json payload: {0}")]
	Json(#[from] serde_json::Error),

	/// A string payload was rejected by a custom decoder.
	#[error("malformed payload: {0}")]
	Malformed(String),
}
