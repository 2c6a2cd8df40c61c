//! Byte-source read primitives: exact-count reads over any [`std::io::Read`]
//! with big-endian integer decoding and consumed-byte tracking.

mod error;
mod source;

pub use error::SourceError;
pub use source::SourceReader;
