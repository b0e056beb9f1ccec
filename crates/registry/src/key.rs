use std::fmt;
use std::marker::PhantomData;

/// Typed handle to a registered preference.
///
/// Carries the value type alongside the key so lookups through
/// [`Registry::get`](crate::Registry::get) need no turbofish and cannot name
/// the wrong type by accident.
pub struct PrefKey<T> {
	name: &'static str,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Clone for PrefKey<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for PrefKey<T> {}

impl<T> PrefKey<T> {
	/// Creates a typed key.
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			_marker: PhantomData,
		}
	}

	/// Returns the string key.
	pub const fn name(&self) -> &'static str {
		self.name
	}
}

impl<T> fmt::Debug for PrefKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("PrefKey")
			.field(&self.name)
			.field(&std::any::type_name::<T>())
			.finish()
	}
}
