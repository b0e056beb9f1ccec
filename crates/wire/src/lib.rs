//! Wire representation of persisted preference values.
//!
//! A [`WireValue`] is what a store actually holds for a key. Primitive Rust types
//! map onto a wire variant directly through [`NativeCodec`]; anything else goes
//! through a string payload produced by [`JsonCodec`], [`FnCodec`], or a custom
//! [`Codec`] implementation.

mod codec;
mod error;
mod value;

pub use codec::{Codec, FnCodec, JsonCodec, NativeCodec, NativeValue};
pub use error::CodecError;
pub use value::{WireKind, WireValue};
