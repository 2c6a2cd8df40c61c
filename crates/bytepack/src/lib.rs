//! Streaming decoder for the classic MessagePack wire format.
//!
//! Consumes a sequential byte stream (anything implementing
//! [`std::io::Read`]) and reconstructs a dynamically-typed value tree:
//! scalars, byte strings, ordered sequences, and key/value mappings of
//! arbitrary nesting, with exact byte-consumption tracking throughout.
//!
//! Two output modes share one decoding core:
//!
//! - **materialized** — [`decode`] produces plain [`Value`] trees;
//! - **reflected** — [`decode_reflected`] produces [`Handle`]s that keep the
//!   original [`Marker`] class per node for later schema-directed binding.
//!
//! ```
//! use bytepack::{decode, Value};
//!
//! // fixarray [ 1, "ab" ]
//! let bytes: &[u8] = &[0x92, 0x01, 0xa2, b'a', b'b'];
//! let (value, consumed) = decode(bytes).unwrap();
//!
//! assert_eq!(consumed, 5);
//! let items = value.as_array().unwrap();
//! assert_eq!(items[0], Value::I8(1));
//! assert_eq!(items[1].as_str(), Some("ab"));
//! ```
//!
//! Decoding fails fast: the first malformed code, truncation, or exceeded
//! safety bound aborts the whole decode with a [`DecodeError`] carrying the
//! stream offset. There is no salvage mode and no logging; errors are the
//! observability surface.

pub mod marker;

mod decoder;
mod error;
mod reflect;
mod to_json;
mod util;
mod value;

pub use decoder::{DecodeLimits, Decoder};
pub use error::DecodeError;
pub use marker::Marker;
pub use reflect::{Handle, TypeHint};
pub use to_json::to_json;
pub use util::{decode, decode_reflected, decode_reflected_with_limits, decode_with_limits};
pub use value::{Key, Value};
