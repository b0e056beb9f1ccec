//! Typed conversion between preference values and [`WireValue`]s.

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{CodecError, WireKind, WireValue};

#[cfg(test)]
mod tests;

/// Bidirectional mapping between `T` and its persisted form.
///
/// `decode(encode(v))` must yield a value equal to `v` for every `v` the codec
/// accepts. Decoding is allowed to fail on foreign or corrupted data; callers
/// treat that as "no usable value".
pub trait Codec<T>: Send + Sync + 'static {
	/// Encodes a value for storage.
	fn encode(&self, value: &T) -> Result<WireValue, CodecError>;

	/// Decodes a stored value.
	fn decode(&self, wire: &WireValue) -> Result<T, CodecError>;

	/// Wire variant produced by [`Codec::encode`].
	fn wire_kind(&self) -> WireKind;
}

// Seal NativeValue so the set of natively stored types stays fixed.
mod sealed {
	use std::collections::BTreeSet;

	pub trait Sealed {}
	impl Sealed for bool {}
	impl Sealed for i32 {}
	impl Sealed for i64 {}
	impl Sealed for f32 {}
	impl Sealed for f64 {}
	impl Sealed for String {}
	impl Sealed for BTreeSet<String> {}
}

/// Types the store holds natively, without a codec.
pub trait NativeValue: sealed::Sealed + Clone + Sized {
	/// Wire variant this type maps onto.
	const KIND: WireKind;

	/// Wraps the value in its wire variant.
	fn to_wire(&self) -> WireValue;

	/// Extracts the value, returning `None` if the variant doesn't match.
	fn from_wire(wire: &WireValue) -> Option<Self>;
}

impl NativeValue for bool {
	const KIND: WireKind = WireKind::Bool;

	fn to_wire(&self) -> WireValue {
		WireValue::Bool(*self)
	}

	fn from_wire(wire: &WireValue) -> Option<Self> {
		wire.as_bool()
	}
}

impl NativeValue for i32 {
	const KIND: WireKind = WireKind::Int;

	fn to_wire(&self) -> WireValue {
		WireValue::Int(*self)
	}

	fn from_wire(wire: &WireValue) -> Option<Self> {
		wire.as_int()
	}
}

impl NativeValue for i64 {
	const KIND: WireKind = WireKind::Long;

	fn to_wire(&self) -> WireValue {
		WireValue::Long(*self)
	}

	fn from_wire(wire: &WireValue) -> Option<Self> {
		wire.as_long()
	}
}

impl NativeValue for f32 {
	const KIND: WireKind = WireKind::Float;

	fn to_wire(&self) -> WireValue {
		WireValue::Float(*self)
	}

	fn from_wire(wire: &WireValue) -> Option<Self> {
		wire.as_float()
	}
}

impl NativeValue for f64 {
	const KIND: WireKind = WireKind::Double;

	fn to_wire(&self) -> WireValue {
		WireValue::Double(*self)
	}

	fn from_wire(wire: &WireValue) -> Option<Self> {
		wire.as_double()
	}
}

impl NativeValue for String {
	const KIND: WireKind = WireKind::String;

	fn to_wire(&self) -> WireValue {
		WireValue::String(self.clone())
	}

	fn from_wire(wire: &WireValue) -> Option<Self> {
		wire.as_str().map(str::to_string)
	}
}

impl NativeValue for BTreeSet<String> {
	const KIND: WireKind = WireKind::StringSet;

	fn to_wire(&self) -> WireValue {
		WireValue::StringSet(self.clone())
	}

	fn from_wire(wire: &WireValue) -> Option<Self> {
		wire.as_string_set().cloned()
	}
}

/// Passthrough codec for [`NativeValue`] types.
pub struct NativeCodec<T>(PhantomData<fn() -> T>);

impl<T> NativeCodec<T> {
	pub const fn new() -> Self {
		Self(PhantomData)
	}
}

impl<T> Default for NativeCodec<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for NativeCodec<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("NativeCodec")
	}
}

impl<T: NativeValue + 'static> Codec<T> for NativeCodec<T> {
	fn encode(&self, value: &T) -> Result<WireValue, CodecError> {
		Ok(value.to_wire())
	}

	fn decode(&self, wire: &WireValue) -> Result<T, CodecError> {
		T::from_wire(wire).ok_or(CodecError::KindMismatch {
			expected: T::KIND,
			found: wire.kind(),
		})
	}

	fn wire_kind(&self) -> WireKind {
		T::KIND
	}
}

/// Codec deriving a JSON string payload from `T`'s serde implementations.
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
	pub const fn new() -> Self {
		Self(PhantomData)
	}
}

impl<T> Default for JsonCodec<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for JsonCodec<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("JsonCodec")
	}
}

impl<T> Codec<T> for JsonCodec<T>
where
	T: Serialize + DeserializeOwned + 'static,
{
	fn encode(&self, value: &T) -> Result<WireValue, CodecError> {
		Ok(WireValue::String(serde_json::to_string(value)?))
	}

	fn decode(&self, wire: &WireValue) -> Result<T, CodecError> {
		let payload = string_payload(wire)?;
		Ok(serde_json::from_str(payload)?)
	}

	fn wire_kind(&self) -> WireKind {
		WireKind::String
	}
}

/// Codec built from a pair of plain functions over a string payload.
///
/// Useful for compact hand-written formats such as `#rrggbb` colors.
pub struct FnCodec<T> {
	encode: fn(&T) -> String,
	decode: fn(&str) -> Result<T, String>,
}

impl<T> FnCodec<T> {
	pub const fn new(encode: fn(&T) -> String, decode: fn(&str) -> Result<T, String>) -> Self {
		Self { encode, decode }
	}
}

impl<T> fmt::Debug for FnCodec<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("FnCodec")
	}
}

impl<T: 'static> Codec<T> for FnCodec<T> {
	fn encode(&self, value: &T) -> Result<WireValue, CodecError> {
		Ok(WireValue::String((self.encode)(value)))
	}

	fn decode(&self, wire: &WireValue) -> Result<T, CodecError> {
		let payload = string_payload(wire)?;
		(self.decode)(payload).map_err(CodecError::Malformed)
	}

	fn wire_kind(&self) -> WireKind {
		WireKind::String
	}
}

fn string_payload(wire: &WireValue) -> Result<&str, CodecError> {
	wire.as_str().ok_or(CodecError::KindMismatch {
		expected: WireKind::String,
		found: wire.kind(),
	})
}
