//! Type-preserving decode output for schema-directed binding.

use indexmap::IndexMap;

use crate::marker::Marker;
use crate::value::{Key, Value};

/// A decoded value that remembers how it was encoded.
///
/// Where the materialized [`Value`] tree is the end of the road, a `Handle`
/// keeps the original [`Marker`] class and exposes a [`TypeHint`] so a later
/// stage can bind values into a destination structure field by field.
/// Handles own their payload outright; nothing is shared with the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    marker: Marker,
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Repr {
    Scalar(Value),
    Sequence(Vec<Handle>),
    Mapping(IndexMap<Key, Handle>),
}

/// What a [`Handle`] would bind to, independent of the exact marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    Nil,
    Bool,
    /// Signed integer of the given bit width (8, 16, 32, or 64).
    Signed { bits: u8 },
    /// Unsigned integer of the given bit width.
    Unsigned { bits: u8 },
    /// IEEE-754 float of the given bit width (32 or 64).
    Float { bits: u8 },
    Bytes,
    Sequence,
    Mapping,
}

impl Handle {
    pub(crate) fn new(marker: Marker, repr: Repr) -> Handle {
        Handle { marker, repr }
    }

    pub(crate) fn into_repr(self) -> Repr {
        self.repr
    }

    /// The marker class this value was encoded with.
    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Binding hint derived from the decoded form.
    pub fn hint(&self) -> TypeHint {
        match &self.repr {
            Repr::Scalar(value) => match value {
                Value::Nil => TypeHint::Nil,
                Value::Bool(_) => TypeHint::Bool,
                Value::I8(_) => TypeHint::Signed { bits: 8 },
                Value::I16(_) => TypeHint::Signed { bits: 16 },
                Value::I32(_) => TypeHint::Signed { bits: 32 },
                Value::I64(_) => TypeHint::Signed { bits: 64 },
                Value::U8(_) => TypeHint::Unsigned { bits: 8 },
                Value::U16(_) => TypeHint::Unsigned { bits: 16 },
                Value::U32(_) => TypeHint::Unsigned { bits: 32 },
                Value::U64(_) => TypeHint::Unsigned { bits: 64 },
                Value::F32(_) => TypeHint::Float { bits: 32 },
                Value::F64(_) => TypeHint::Float { bits: 64 },
                Value::Bytes(_) => TypeHint::Bytes,
                // The decoder only ever puts scalars here.
                Value::Array(_) => TypeHint::Sequence,
                Value::Map(_) => TypeHint::Mapping,
            },
            Repr::Sequence(_) => TypeHint::Sequence,
            Repr::Mapping(_) => TypeHint::Mapping,
        }
    }

    /// The scalar payload, when this handle holds one.
    pub fn value(&self) -> Option<&Value> {
        match &self.repr {
            Repr::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Sequence elements, in encounter order.
    pub fn items(&self) -> Option<&[Handle]> {
        match &self.repr {
            Repr::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Mapping entries, keyed by the normalized [`Key`] domain.
    pub fn entries(&self) -> Option<&IndexMap<Key, Handle>> {
        match &self.repr {
            Repr::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a mapping entry by text key.
    pub fn get(&self, key: &str) -> Option<&Handle> {
        match &self.repr {
            Repr::Mapping(entries) => entries.get(&Key::Str(key.to_owned())),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value().and_then(Value::as_bool)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value().and_then(Value::as_i64)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.value().and_then(Value::as_u64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value().and_then(Value::as_f64)
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.value().and_then(Value::as_bytes)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    /// Collapses the handle tree into the materialized form, discarding the
    /// marker metadata.
    pub fn into_value(self) -> Value {
        match self.repr {
            Repr::Scalar(value) => value,
            Repr::Sequence(items) => {
                Value::Array(items.into_iter().map(Handle::into_value).collect())
            }
            Repr::Mapping(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_value()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_handle_reports_marker_and_hint() {
        let handle = Handle::new(Marker::UInt16, Repr::Scalar(Value::U16(300)));
        assert_eq!(handle.marker(), Marker::UInt16);
        assert_eq!(handle.hint(), TypeHint::Unsigned { bits: 16 });
        assert_eq!(handle.as_u64(), Some(300));
        assert_eq!(handle.as_bytes(), None);
    }

    #[test]
    fn container_handles_collapse_to_values() {
        let inner = Handle::new(Marker::PosFixInt(7), Repr::Scalar(Value::I8(7)));
        let seq = Handle::new(Marker::FixArray(1), Repr::Sequence(vec![inner]));
        assert_eq!(seq.hint(), TypeHint::Sequence);
        assert_eq!(seq.into_value(), Value::Array(vec![Value::I8(7)]));
    }

    #[test]
    fn mapping_handle_lookup_by_text() {
        let mut entries = IndexMap::new();
        entries.insert(
            Key::Str("k".to_owned()),
            Handle::new(Marker::True, Repr::Scalar(Value::Bool(true))),
        );
        let map = Handle::new(Marker::FixMap(1), Repr::Mapping(entries));
        assert_eq!(map.get("k").and_then(Handle::as_bool), Some(true));
        assert_eq!(map.get("absent"), None);
    }
}
