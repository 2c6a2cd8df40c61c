//! The universal decoded value type and the mapping-key domain.

use indexmap::IndexMap;

/// A fully decoded value tree.
///
/// The tag preserves the width and signedness of the encoded form: a uint8 on
/// the wire stays [`Value::U8`], it is never widened through a common integer
/// type. Once constructed a `Value` is immutable and self-describing.
///
/// Mappings preserve encounter order for deterministic iteration; key lookup
/// goes through the normalized [`Key`] domain.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Raw byte string (fixraw, raw16, raw32). The classic encoding does not
    /// distinguish text from binary.
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(IndexMap<Key, Value>),
}

impl Value {
    /// True for [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Signed view of any integer variant that fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(n) => Some(i64::from(*n)),
            Value::I16(n) => Some(i64::from(*n)),
            Value::I32(n) => Some(i64::from(*n)),
            Value::I64(n) => Some(*n),
            Value::U8(n) => Some(i64::from(*n)),
            Value::U16(n) => Some(i64::from(*n)),
            Value::U32(n) => Some(i64::from(*n)),
            Value::U64(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Unsigned view of any non-negative integer variant.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(n) => Some(u64::from(*n)),
            Value::U16(n) => Some(u64::from(*n)),
            Value::U32(n) => Some(u64::from(*n)),
            Value::U64(n) => Some(*n),
            Value::I8(n) => u64::try_from(*n).ok(),
            Value::I16(n) => u64::try_from(*n).ok(),
            Value::I32(n) => u64::try_from(*n).ok(),
            Value::I64(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Float view; widens `F32` losslessly.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(f) => Some(f64::from(*f)),
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Byte-string payload as UTF-8 text, when it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Key, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a mapping entry by text key. Byte-string keys were normalized
    /// to text at decode time, so this finds entries that were encoded as raw
    /// byte strings too.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.get(&Key::Str(key.to_owned())),
            _ => None,
        }
    }
}

/// Mapping-key domain: every non-container value kind.
///
/// Byte-string keys are normalized to their textual form so byte-identical
/// string keys always collide under the map's equality and hash. Float keys
/// are identified by their IEEE-754 bit pattern, which keeps `Key` hashable
/// (and makes NaN keys representable and stable).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Nil,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32Bits(u32),
    F64Bits(u64),
    Str(String),
}

impl Key {
    /// Normalizes a decoded value into a key.
    ///
    /// Byte strings become [`Key::Str`] (lossy for invalid UTF-8, keeping
    /// lookups total); containers are rejected and handed back unchanged.
    pub fn from_value(value: Value) -> Result<Key, Value> {
        Ok(match value {
            Value::Nil => Key::Nil,
            Value::Bool(b) => Key::Bool(b),
            Value::I8(n) => Key::I8(n),
            Value::I16(n) => Key::I16(n),
            Value::I32(n) => Key::I32(n),
            Value::I64(n) => Key::I64(n),
            Value::U8(n) => Key::U8(n),
            Value::U16(n) => Key::U16(n),
            Value::U32(n) => Key::U32(n),
            Value::U64(n) => Key::U64(n),
            Value::F32(f) => Key::F32Bits(f.to_bits()),
            Value::F64(f) => Key::F64Bits(f.to_bits()),
            Value::Bytes(b) => match String::from_utf8(b) {
                Ok(s) => Key::Str(s),
                Err(e) => Key::Str(String::from_utf8_lossy(e.as_bytes()).into_owned()),
            },
            container @ (Value::Array(_) | Value::Map(_)) => return Err(container),
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Reconstructed float for a bit-pattern key.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Key::F32Bits(bits) => Some(f32::from_bits(*bits)),
            _ => None,
        }
    }

    /// Reconstructed float for a bit-pattern key.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Key::F64Bits(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Key {
        Key::Str(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Key {
        Key::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_string_keys_normalize_to_text() {
        let key = Key::from_value(Value::Bytes(b"k".to_vec())).unwrap();
        assert_eq!(key, Key::Str("k".to_owned()));
    }

    #[test]
    fn invalid_utf8_keys_normalize_lossily() {
        let key = Key::from_value(Value::Bytes(vec![0xff, b'a'])).unwrap();
        assert_eq!(key, Key::Str("\u{fffd}a".to_owned()));
    }

    #[test]
    fn containers_are_rejected_as_keys() {
        let rejected = Key::from_value(Value::Array(vec![Value::Nil]));
        assert!(rejected.is_err());
        let rejected = Key::from_value(Value::Map(IndexMap::new()));
        assert!(rejected.is_err());
    }

    #[test]
    fn scalar_keys_keep_their_width() {
        assert_eq!(Key::from_value(Value::U8(1)).unwrap(), Key::U8(1));
        assert_eq!(Key::from_value(Value::I64(-1)).unwrap(), Key::I64(-1));
        assert_ne!(Key::U8(1), Key::U16(1));
    }

    #[test]
    fn float_keys_hash_by_bit_pattern() {
        let a = Key::from_value(Value::F64(f64::NAN)).unwrap();
        let b = Key::from_value(Value::F64(f64::NAN)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_f64().map(f64::is_nan), Some(true));
    }

    #[test]
    fn map_lookup_by_text_key() {
        let mut entries = IndexMap::new();
        entries.insert(Key::Str("k".to_owned()), Value::I8(1));
        let map = Value::Map(entries);
        assert_eq!(map.get("k"), Some(&Value::I8(1)));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn integer_views_widen() {
        assert_eq!(Value::U32(7).as_i64(), Some(7));
        assert_eq!(Value::U64(u64::MAX).as_i64(), None);
        assert_eq!(Value::U64(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Value::I8(-1).as_u64(), None);
        assert_eq!(Value::F32(1.5).as_f64(), Some(1.5));
    }
}
