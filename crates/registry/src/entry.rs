use std::fmt;
use std::sync::Arc;

use prefs_wire::{Codec, JsonCodec, NativeCodec, NativeValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::binding::{self, BindContext, DynBinding};
use crate::{PrefError, Result};

/// Bounds every preference value type satisfies.
pub trait PrefValue: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> PrefValue for T {}

/// Declaration of one preference: key, default value and codec.
pub struct PreferenceEntry<T> {
	pub(crate) key: String,
	pub(crate) default: T,
	pub(crate) codec: Arc<dyn Codec<T>>,
}

impl<T: PrefValue> PreferenceEntry<T> {
	/// Declares a preference stored through `codec`.
	pub fn new(key: impl Into<String>, default: T, codec: impl Codec<T>) -> Self {
		Self {
			key: key.into(),
			default,
			codec: Arc::new(codec),
		}
	}

	/// Declares a preference of a natively stored type.
	pub fn native(key: impl Into<String>, default: T) -> Self
	where
		T: NativeValue,
	{
		Self::new(key, default, NativeCodec::<T>::new())
	}

	/// Declares a preference stored as a JSON string payload.
	pub fn json(key: impl Into<String>, default: T) -> Self
	where
		T: Serialize + DeserializeOwned,
	{
		Self::new(key, default, JsonCodec::<T>::new())
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn default_value(&self) -> &T {
		&self.default
	}
}

impl<T> fmt::Debug for PreferenceEntry<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PreferenceEntry")
			.field("key", &self.key)
			.field("type", &std::any::type_name::<T>())
			.finish()
	}
}

/// Type-erased entry accepted by [`RegistryBuilder::register`](crate::RegistryBuilder::register).
///
/// Lets heterogeneous entries travel in one list. Implemented for every
/// [`PreferenceEntry`].
pub trait RegisterEntry: Send {
	fn key(&self) -> &str;

	/// Name of the value type, used in mismatch errors.
	fn type_name(&self) -> &'static str;

	/// Checks that the default can be encoded.
	fn validate(&self) -> Result<()>;

	#[doc(hidden)]
	fn bind(self: Box<Self>, ctx: &mut BindContext) -> Arc<dyn DynBinding>;
}

impl<T: PrefValue> RegisterEntry for PreferenceEntry<T> {
	fn key(&self) -> &str {
		&self.key
	}

	fn type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}

	fn validate(&self) -> Result<()> {
		self.codec
			.encode(&self.default)
			.map(drop)
			.map_err(|error| PrefError::UnsupportedType {
				key: self.key.clone(),
				type_name: std::any::type_name::<T>().to_string(),
				reason: error.to_string(),
			})
	}

	fn bind(self: Box<Self>, ctx: &mut BindContext) -> Arc<dyn DynBinding> {
		Arc::new(binding::bind(*self, ctx))
	}
}

impl<T: PrefValue> From<PreferenceEntry<T>> for Box<dyn RegisterEntry> {
	fn from(entry: PreferenceEntry<T>) -> Self {
		Box::new(entry)
	}
}
