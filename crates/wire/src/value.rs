use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A value as held by the underlying key-value store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum WireValue {
	/// Boolean value.
	Bool(bool),
	/// 32-bit integer value.
	Int(i32),
	/// 64-bit integer value.
	Long(i64),
	/// Single-precision float value.
	Float(f32),
	/// Double-precision float value.
	Double(f64),
	/// String value, also the carrier for codec payloads.
	String(String),
	/// Ordered set of strings.
	StringSet(BTreeSet<String>),
}

impl WireValue {
	/// Returns the variant tag of this value.
	pub fn kind(&self) -> WireKind {
		match self {
			WireValue::Bool(_) => WireKind::Bool,
			WireValue::Int(_) => WireKind::Int,
			WireValue::Long(_) => WireKind::Long,
			WireValue::Float(_) => WireKind::Float,
			WireValue::Double(_) => WireKind::Double,
			WireValue::String(_) => WireKind::String,
			WireValue::StringSet(_) => WireKind::StringSet,
		}
	}

	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			WireValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i32> {
		match self {
			WireValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is a `Long` variant.
	pub fn as_long(&self) -> Option<i64> {
		match self {
			WireValue::Long(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f32> {
		match self {
			WireValue::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_double(&self) -> Option<f64> {
		match self {
			WireValue::Double(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `String` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			WireValue::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_string_set(&self) -> Option<&BTreeSet<String>> {
		match self {
			WireValue::StringSet(v) => Some(v),
			_ => None,
		}
	}
}

impl fmt::Display for WireValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			WireValue::Bool(v) => write!(f, "{v}"),
			WireValue::Int(v) => write!(f, "{v}"),
			WireValue::Long(v) => write!(f, "{v}"),
			WireValue::Float(v) => write!(f, "{v}"),
			WireValue::Double(v) => write!(f, "{v}"),
			WireValue::String(v) => write!(f, "{v:?}"),
			WireValue::StringSet(set) => {
				f.write_str("[")?;
				for (i, item) in set.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item:?}")?;
				}
				f.write_str("]")
			}
		}
	}
}

impl From<bool> for WireValue {
	fn from(v: bool) -> Self {
		WireValue::Bool(v)
	}
}

impl From<i32> for WireValue {
	fn from(v: i32) -> Self {
		WireValue::Int(v)
	}
}

impl From<i64> for WireValue {
	fn from(v: i64) -> Self {
		WireValue::Long(v)
	}
}

impl From<f32> for WireValue {
	fn from(v: f32) -> Self {
		WireValue::Float(v)
	}
}

impl From<f64> for WireValue {
	fn from(v: f64) -> Self {
		WireValue::Double(v)
	}
}

impl From<String> for WireValue {
	fn from(v: String) -> Self {
		WireValue::String(v)
	}
}

impl From<&str> for WireValue {
	fn from(v: &str) -> Self {
		WireValue::String(v.to_string())
	}
}

impl From<BTreeSet<String>> for WireValue {
	fn from(v: BTreeSet<String>) -> Self {
		WireValue::StringSet(v)
	}
}

/// The variant of a [`WireValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
	Bool,
	Int,
	Long,
	Float,
	Double,
	String,
	StringSet,
}

impl WireKind {
	/// Returns the name used in persisted data and declarative config.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Long => "long",
			Self::Float => "float",
			Self::Double => "double",
			Self::String => "string",
			Self::StringSet => "string_set",
		}
	}
}

impl fmt::Display for WireKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
