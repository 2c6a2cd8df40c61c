//! One-shot decode helpers.

use std::io::Read;

use crate::decoder::{DecodeLimits, Decoder};
use crate::error::DecodeError;
use crate::reflect::Handle;
use crate::value::Value;

/// Decodes one value from the source, returning it with the exact number of
/// bytes consumed.
pub fn decode<R: Read>(source: R) -> Result<(Value, usize), DecodeError> {
    decode_with_limits(source, DecodeLimits::default())
}

/// [`decode`] with explicit safety bounds.
pub fn decode_with_limits<R: Read>(
    source: R,
    limits: DecodeLimits,
) -> Result<(Value, usize), DecodeError> {
    let mut decoder = Decoder::with_limits(source, limits);
    let value = decoder.decode()?;
    Ok((value, decoder.bytes_consumed()))
}

/// Decodes one value as a marker-preserving handle tree.
pub fn decode_reflected<R: Read>(source: R) -> Result<(Handle, usize), DecodeError> {
    decode_reflected_with_limits(source, DecodeLimits::default())
}

/// [`decode_reflected`] with explicit safety bounds.
pub fn decode_reflected_with_limits<R: Read>(
    source: R,
    limits: DecodeLimits,
) -> Result<(Handle, usize), DecodeError> {
    let mut decoder = Decoder::with_limits(source, limits);
    let handle = decoder.decode_reflected()?;
    Ok((handle, decoder.bytes_consumed()))
}
