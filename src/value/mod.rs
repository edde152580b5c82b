// Host values supplied to template expansion
//
// A context is either an ordered key/value map or a record that exposes its
// fields through the `Properties` trait. Values inside it are scalars, flat
// lists of scalars, or one-level maps/records of scalars.

mod codec;
mod resolver;

pub use codec::ScalarCodec;
pub use resolver::{ResolvedValue, ValueResolver};

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Field-bag capability for record-like contexts
///
/// Implement this for your own types to expand templates against them
/// without first copying their fields into a map.
pub trait Properties: Send + Sync {
    /// Names of readable fields, in a stable order
    fn property_names(&self) -> Vec<String>;

    /// Value of a single field, `None` when the record has no such field
    fn property(&self, name: &str) -> Option<Value>;
}

/// A simple value with a canonical string form
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Float32(f32),
    Decimal(Decimal),
    Uuid(Uuid),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
}

/// Families used to check that a list is homogeneous
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarFamily {
    Text,
    Boolean,
    Number,
    Uuid,
    DateTime,
}

impl Scalar {
    pub(crate) fn family(&self) -> ScalarFamily {
        match self {
            Scalar::String(_) => ScalarFamily::Text,
            Scalar::Bool(_) => ScalarFamily::Boolean,
            Scalar::Int(_)
            | Scalar::UInt(_)
            | Scalar::Float(_)
            | Scalar::Float32(_)
            | Scalar::Decimal(_) => ScalarFamily::Number,
            Scalar::Uuid(_) => ScalarFamily::Uuid,
            Scalar::DateTime(_) | Scalar::DateTimeOffset(_) => ScalarFamily::DateTime,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ScalarCodec::to_canonical_string(self))
    }
}

/// Any value a context can hold
#[derive(Clone)]
pub enum Value {
    Null,
    Scalar(Scalar),
    List(Vec<Value>),
    /// Ordered key/value pairs
    Map(Vec<(String, Value)>),
    Record(Arc<dyn Properties>),
}

impl Value {
    /// Build an ordered map from key/value pairs
    pub fn map<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Wrap a `Properties` implementation as a record value
    pub fn record<P: Properties + 'static>(record: P) -> Self {
        Value::Record(Arc::new(record))
    }

    /// Convert any serializable record into a map, keeping field order
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Value::from)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub(crate) fn shape_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Scalar(_) => "scalar",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(pairs) => f.debug_tuple("Map").field(pairs).finish(),
            Value::Record(record) => f
                .debug_tuple("Record")
                .field(&record.property_names())
                .finish(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::$variant(<$target>::from(v)))
                }
            }
        )*
    };
}

impl_from_scalar! {
    String => String as String,
    &str => String as String,
    &String => String as String,
    bool => Bool as bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    f64 => Float as f64,
    f32 => Float32 as f32,
    Decimal => Decimal as Decimal,
    Uuid => Uuid as Uuid,
    NaiveDateTime => DateTime as NaiveDateTime,
    DateTime<FixedOffset> => DateTimeOffset as DateTime<FixedOffset>,
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Scalar(Scalar::Int(v as i64))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Scalar(Scalar::UInt(v as u64))
    }
}

impl From<i128> for Value {
    fn from(v: i128) -> Self {
        if let Ok(i) = i64::try_from(v) {
            return Value::Scalar(Scalar::Int(i));
        }
        match Decimal::try_from_i128_with_scale(v, 0) {
            Ok(d) => Value::Scalar(Scalar::Decimal(d)),
            Err(_) => Value::Scalar(Scalar::String(v.to_string())),
        }
    }
}

impl From<u128> for Value {
    fn from(v: u128) -> Self {
        match u64::try_from(v) {
            Ok(u) => Value::Scalar(Scalar::UInt(u)),
            Err(_) => match i128::try_from(v) {
                Ok(i) => Value::from(i),
                Err(_) => Value::Scalar(Scalar::String(v.to_string())),
            },
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::List(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<HashSet<T>> for Value {
    fn from(items: HashSet<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeSet<T>> for Value {
    fn from(items: BTreeSet<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        Value::map(map)
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Value::map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => b.into(),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.into()
                } else if let Some(u) = n.as_u64() {
                    u.into()
                } else {
                    n.as_f64().map(Value::from).unwrap_or(Value::Null)
                }
            }
            Json::String(s) => s.into(),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(fields) => Value::map(fields),
        }
    }
}
