//! Top-level dispatcher and the shared scalar/container decoding core.

use std::io::Read;

use bytepack_buffers::{SourceError, SourceReader};
use indexmap::IndexMap;

use crate::error::DecodeError;
use crate::marker::Marker;
use crate::reflect::{Handle, Repr};
use crate::value::{Key, Value};

/// Safety bounds applied while decoding.
///
/// The explicit 16/32-bit length fields of the wire format let a hostile
/// input declare lengths far beyond anything a legitimate payload carries;
/// these bounds reject such inputs before any allocation. Depth bounds the
/// recursive descent on crafted nesting.
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
    /// Largest accepted byte length for a single raw value.
    pub max_bytes: usize,
    /// Largest accepted element/entry count for a single container.
    pub max_items: usize,
    /// Deepest accepted container nesting.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_bytes: 64 * 1024 * 1024,
            max_items: 1024 * 1024,
            max_depth: 128,
        }
    }
}

/// Streaming decoder for one byte source.
///
/// Each call to [`decode`](Decoder::decode) or
/// [`decode_reflected`](Decoder::decode_reflected) consumes exactly one
/// encoded value from the stream; [`bytes_consumed`](Decoder::bytes_consumed)
/// reports the running total since construction, on success and after a
/// failure alike.
///
/// # Example
///
/// ```
/// use bytepack::{Decoder, Value};
///
/// // fixmap { "a": 1 }
/// let bytes: &[u8] = &[0x81, 0xa1, b'a', 0x01];
/// let mut decoder = Decoder::new(bytes);
/// let value = decoder.decode().unwrap();
///
/// assert_eq!(value.get("a"), Some(&Value::I8(1)));
/// assert_eq!(decoder.bytes_consumed(), 4);
/// ```
pub struct Decoder<R> {
    source: SourceReader<R>,
    limits: DecodeLimits,
}

/// Output strategy over the shared decoding core: one impl materializes plain
/// [`Value`] trees, the other wraps every node in a marker-preserving
/// [`Handle`]. Container cases stay strategy-agnostic.
trait Output: Sized {
    fn scalar(marker: Marker, value: Value) -> Self;
    fn sequence(marker: Marker, items: Vec<Self>) -> Self;
    fn mapping(marker: Marker, entries: IndexMap<Key, Self>) -> Self;
    /// Normalizes this decoded node for use in map-key position; fails for
    /// containers.
    fn into_key(self) -> Option<Key>;
}

impl Output for Value {
    fn scalar(_marker: Marker, value: Value) -> Value {
        value
    }

    fn sequence(_marker: Marker, items: Vec<Value>) -> Value {
        Value::Array(items)
    }

    fn mapping(_marker: Marker, entries: IndexMap<Key, Value>) -> Value {
        Value::Map(entries)
    }

    fn into_key(self) -> Option<Key> {
        Key::from_value(self).ok()
    }
}

impl Output for Handle {
    fn scalar(marker: Marker, value: Value) -> Handle {
        Handle::new(marker, Repr::Scalar(value))
    }

    fn sequence(marker: Marker, items: Vec<Handle>) -> Handle {
        Handle::new(marker, Repr::Sequence(items))
    }

    fn mapping(marker: Marker, entries: IndexMap<Key, Handle>) -> Handle {
        Handle::new(marker, Repr::Mapping(entries))
    }

    fn into_key(self) -> Option<Key> {
        match self.into_repr() {
            Repr::Scalar(value) => Key::from_value(value).ok(),
            Repr::Sequence(_) | Repr::Mapping(_) => None,
        }
    }
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder with [`DecodeLimits::default`].
    pub fn new(source: R) -> Self {
        Self::with_limits(source, DecodeLimits::default())
    }

    pub fn with_limits(source: R, limits: DecodeLimits) -> Self {
        Self {
            source: SourceReader::new(source),
            limits,
        }
    }

    /// Total bytes consumed from the source, valid after success or failure.
    pub fn bytes_consumed(&self) -> usize {
        self.source.consumed()
    }

    /// Decodes one value as a materialized [`Value`] tree.
    pub fn decode(&mut self) -> Result<Value, DecodeError> {
        self.read_any(0)
    }

    /// Decodes one value as a marker-preserving [`Handle`] tree.
    pub fn decode_reflected(&mut self) -> Result<Handle, DecodeError> {
        self.read_any(0)
    }

    fn lift(&self, err: SourceError) -> DecodeError {
        match err {
            SourceError::Truncated { missing } => DecodeError::Truncated {
                consumed: self.source.consumed(),
                missing,
            },
            SourceError::Io(source) => DecodeError::Io {
                offset: self.source.consumed(),
                source,
            },
        }
    }

    fn take_u8(&mut self) -> Result<u8, DecodeError> {
        let r = self.source.read_u8();
        r.map_err(|e| self.lift(e))
    }

    fn take_i8(&mut self) -> Result<i8, DecodeError> {
        let r = self.source.read_i8();
        r.map_err(|e| self.lift(e))
    }

    fn take_u16(&mut self) -> Result<u16, DecodeError> {
        let r = self.source.read_u16();
        r.map_err(|e| self.lift(e))
    }

    fn take_i16(&mut self) -> Result<i16, DecodeError> {
        let r = self.source.read_i16();
        r.map_err(|e| self.lift(e))
    }

    fn take_u32(&mut self) -> Result<u32, DecodeError> {
        let r = self.source.read_u32();
        r.map_err(|e| self.lift(e))
    }

    fn take_i32(&mut self) -> Result<i32, DecodeError> {
        let r = self.source.read_i32();
        r.map_err(|e| self.lift(e))
    }

    fn take_u64(&mut self) -> Result<u64, DecodeError> {
        let r = self.source.read_u64();
        r.map_err(|e| self.lift(e))
    }

    fn take_i64(&mut self) -> Result<i64, DecodeError> {
        let r = self.source.read_i64();
        r.map_err(|e| self.lift(e))
    }

    fn check_bytes(&self, declared: usize) -> Result<(), DecodeError> {
        if declared > self.limits.max_bytes {
            return Err(DecodeError::OversizedLength {
                declared,
                limit: self.limits.max_bytes,
                offset: self.source.consumed(),
            });
        }
        Ok(())
    }

    fn check_items(&self, declared: usize) -> Result<(), DecodeError> {
        if declared > self.limits.max_items {
            return Err(DecodeError::OversizedLength {
                declared,
                limit: self.limits.max_items,
                offset: self.source.consumed(),
            });
        }
        Ok(())
    }

    /// Reads one marker byte, classifies it, and decodes the value it
    /// introduces. Containers recurse back in for each element.
    fn read_any<O: Output>(&mut self, depth: usize) -> Result<O, DecodeError> {
        let byte = self.take_u8()?;
        let marker = Marker::classify(byte);
        match marker {
            // Fixints are the marker byte itself reinterpreted as i8.
            Marker::PosFixInt(n) => Ok(O::scalar(marker, Value::I8(n as i8))),
            Marker::NegFixInt(n) => Ok(O::scalar(marker, Value::I8(n))),
            Marker::Nil => Ok(O::scalar(marker, Value::Nil)),
            Marker::False => Ok(O::scalar(marker, Value::Bool(false))),
            Marker::True => Ok(O::scalar(marker, Value::Bool(true))),
            Marker::Float32 => {
                let bits = self.take_u32()?;
                Ok(O::scalar(marker, Value::F32(f32::from_bits(bits))))
            }
            Marker::Float64 => {
                let bits = self.take_u64()?;
                Ok(O::scalar(marker, Value::F64(f64::from_bits(bits))))
            }
            Marker::UInt8 => {
                let n = self.take_u8()?;
                Ok(O::scalar(marker, Value::U8(n)))
            }
            Marker::UInt16 => {
                let n = self.take_u16()?;
                Ok(O::scalar(marker, Value::U16(n)))
            }
            Marker::UInt32 => {
                let n = self.take_u32()?;
                Ok(O::scalar(marker, Value::U32(n)))
            }
            Marker::UInt64 => {
                let n = self.take_u64()?;
                Ok(O::scalar(marker, Value::U64(n)))
            }
            Marker::Int8 => {
                let n = self.take_i8()?;
                Ok(O::scalar(marker, Value::I8(n)))
            }
            Marker::Int16 => {
                let n = self.take_i16()?;
                Ok(O::scalar(marker, Value::I16(n)))
            }
            Marker::Int32 => {
                let n = self.take_i32()?;
                Ok(O::scalar(marker, Value::I32(n)))
            }
            Marker::Int64 => {
                let n = self.take_i64()?;
                Ok(O::scalar(marker, Value::I64(n)))
            }
            Marker::FixRaw(len) => self.read_raw(marker, len as usize),
            Marker::Raw16 => {
                let len = self.take_u16()? as usize;
                self.read_raw(marker, len)
            }
            Marker::Raw32 => {
                let len = self.take_u32()? as usize;
                self.read_raw(marker, len)
            }
            Marker::FixArray(count) => self.read_sequence(marker, count as usize, depth),
            Marker::Array16 => {
                let count = self.take_u16()? as usize;
                self.read_sequence(marker, count, depth)
            }
            Marker::Array32 => {
                let count = self.take_u32()? as usize;
                self.read_sequence(marker, count, depth)
            }
            Marker::FixMap(count) => self.read_mapping(marker, count as usize, depth),
            Marker::Map16 => {
                let count = self.take_u16()? as usize;
                self.read_mapping(marker, count, depth)
            }
            Marker::Map32 => {
                let count = self.take_u32()? as usize;
                self.read_mapping(marker, count, depth)
            }
            Marker::Reserved(code) => Err(DecodeError::MalformedFormatCode {
                code,
                offset: self.source.consumed() - 1,
            }),
        }
    }

    fn read_raw<O: Output>(&mut self, marker: Marker, len: usize) -> Result<O, DecodeError> {
        self.check_bytes(len)?;
        let r = self.source.read_exact_vec(len);
        let payload = r.map_err(|e| self.lift(e))?;
        Ok(O::scalar(marker, Value::Bytes(payload)))
    }

    fn read_sequence<O: Output>(
        &mut self,
        marker: Marker,
        count: usize,
        depth: usize,
    ) -> Result<O, DecodeError> {
        self.check_items(count)?;
        if depth >= self.limits.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                limit: self.limits.max_depth,
            });
        }
        // Capacity is not trusted from the wire: elements must actually
        // arrive before the vector grows past this.
        let mut items = Vec::with_capacity(count.min(256));
        for _ in 0..count {
            items.push(self.read_any(depth + 1)?);
        }
        Ok(O::sequence(marker, items))
    }

    fn read_mapping<O: Output>(
        &mut self,
        marker: Marker,
        count: usize,
        depth: usize,
    ) -> Result<O, DecodeError> {
        self.check_items(count)?;
        if depth >= self.limits.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                limit: self.limits.max_depth,
            });
        }
        let mut entries = IndexMap::with_capacity(count.min(256));
        for _ in 0..count {
            let key_offset = self.source.consumed();
            let key = self
                .read_any::<O>(depth + 1)?
                .into_key()
                .ok_or(DecodeError::InvalidMapKey { offset: key_offset })?;
            let value = self.read_any(depth + 1)?;
            entries.insert(key, value);
        }
        Ok(O::mapping(marker, entries))
    }
}
