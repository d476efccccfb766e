//! Schema-driven copying of loosely typed JSON objects into typed records.
//!
//! Every record type publishes a static table of `(key, setter)` pairs. Decoding walks the
//! table, looks each key up in the source object and calls the setter only when the JSON
//! value has the kind the setter expects. Anything else leaves the field at its default.

use serde_json::{Map, Value};

/// Scalar kinds a record field can accept.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Number,
    Text,
}

pub enum Setter<T> {
    Number(fn(&mut T, f64)),
    Text(fn(&mut T, &str)),
}

/// One entry of a record's field table.
pub struct Field<T> {
    pub key: &'static str,
    pub setter: Setter<T>,
}

impl<T> Field<T> {
    pub const fn number(key: &'static str, set: fn(&mut T, f64)) -> Self {
        Self {
            key,
            setter: Setter::Number(set),
        }
    }

    pub const fn text(key: &'static str, set: fn(&mut T, &str)) -> Self {
        Self {
            key,
            setter: Setter::Text(set),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self.setter {
            Setter::Number(_) => FieldKind::Number,
            Setter::Text(_) => FieldKind::Text,
        }
    }

    /// Apply `value` if its JSON type matches; returns whether it was copied.
    fn apply(&self, target: &mut T, value: &Value) -> bool {
        match (&self.setter, value) {
            (Setter::Number(set), Value::Number(n)) => match n.as_f64() {
                Some(v) => {
                    set(target, v);
                    true
                }
                None => false,
            },
            (Setter::Text(set), Value::String(s)) => {
                set(target, s);
                true
            }
            _ => false,
        }
    }
}

/// A record decodable from a JSON object through its field table.
pub trait Record: Default + 'static {
    const FIELDS: &'static [Field<Self>];
}

/// Copy every declared field present in `source` with a matching type into `target`.
///
/// Returns the number of fields copied. Never fails.
pub fn copy_fields<T: Record>(target: &mut T, source: &Map<String, Value>) -> usize {
    let mut copied = 0;
    for field in T::FIELDS {
        let Some(value) = source.get(field.key) else {
            continue;
        };
        if field.apply(target, value) {
            copied += 1;
        } else {
            tracing::trace!(
                key = field.key,
                expected = ?field.kind(),
                "field type mismatch, keeping default"
            );
        }
    }
    copied
}

/// Decode a fresh record from an object.
pub fn decode<T: Record>(source: &Map<String, Value>) -> T {
    let mut record = T::default();
    copy_fields(&mut record, source);
    record
}

/// Decode a fresh record from an optional value; anything but an object gives the default.
pub fn decode_value<T: Record>(value: Option<&Value>) -> T {
    match value.and_then(Value::as_object) {
        Some(obj) => decode(obj),
        None => T::default(),
    }
}

/// Build a [`Field`] whose key is the struct field's name.
macro_rules! field {
    ($ty:ty, $name:ident: number) => {
        $crate::schema::Field::<$ty>::number(stringify!($name), |r: &mut $ty, v: f64| {
            r.$name = v
        })
    };
    ($ty:ty, $name:ident: text) => {
        $crate::schema::Field::<$ty>::text(stringify!($name), |r: &mut $ty, v: &str| {
            r.$name = v.to_string()
        })
    };
    ($ty:ty, $name:ident: text = $key:literal) => {
        $crate::schema::Field::<$ty>::text($key, |r: &mut $ty, v: &str| {
            r.$name = v.to_string()
        })
    };
}
pub(crate) use field;
