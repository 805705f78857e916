//! Dynamic attribute values.
//!
//! Attribute values are a closed set of tagged variants plus an `Opaque` escape
//! hatch for user types. Composite variants are reference-counted, so a clone
//! of a `Value` shares its allocation: this is what gives defaults a reference
//! identity distinct from structural equality (see [`Value::is_identical`]).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::pretty::{Formattable, PrettyOptions};
use crate::value_object::ValueObject;

/// Textual layout used by `Time.parse("...")` renderings.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const TIME_FORMAT_FRACTIONAL: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// A user-supplied value with no pretty-print capability of its own.
///
/// Rendered with its `Debug` output. Implemented for every
/// `Debug + PartialEq + Send + Sync + 'static` type.
pub trait Opaque: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn eq_opaque(&self, other: &dyn Opaque) -> bool;
}

impl<T> Opaque for T
where
    T: fmt::Debug + PartialEq + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_opaque(&self, other: &dyn Opaque) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// An attribute value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Symbol(Arc<str>),
    Str(Arc<str>),
    Time(Arc<DateTime<FixedOffset>>),
    List(Arc<Vec<Value>>),
    Map(Arc<IndexMap<Value, Value>>),
    Object(ValueObject),
    Opaque(Arc<dyn Opaque>),
}

impl Value {
    pub fn symbol(name: impl AsRef<str>) -> Self {
        Value::Symbol(Arc::from(name.as_ref()))
    }

    pub fn string(text: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(text.as_ref()))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Arc::new(items.into_iter().collect()))
    }

    pub fn empty_list() -> Self {
        Value::List(Arc::new(Vec::new()))
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(Arc::new(entries.into_iter().collect()))
    }

    pub fn empty_map() -> Self {
        Value::Map(Arc::new(IndexMap::new()))
    }

    pub fn opaque<T>(value: T) -> Self
    where
        T: fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        Value::Opaque(Arc::new(value))
    }

    /// Parse a timestamp in the `Time.parse("...")` text layout.
    pub fn parse_time(text: &str) -> Option<Self> {
        DateTime::parse_from_str(text, TIME_FORMAT_FRACTIONAL)
            .or_else(|_| DateTime::parse_from_str(text, TIME_FORMAT))
            .ok()
            .map(Value::from)
    }

    /// Short type label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Symbol(_) => "symbol",
            Value::Str(_) => "string",
            Value::Time(_) => "time",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Opaque(_) => "opaque",
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ValueObject> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Symbol(s) => Some(&**s),
            _ => None,
        }
    }

    /// Reference identity.
    ///
    /// Shared variants are identical only when they point at the same
    /// allocation, timestamps included. Immediates (nil, booleans, numbers,
    /// symbols) have no separate identity and are identical when equal.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a.is_same(b),
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            (Value::Time(a), Value::Time(b)) => Arc::ptr_eq(a, b),
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (a, b) if a.is_immediate() && b.is_immediate() => a == b,
            _ => false,
        }
    }

    fn is_immediate(&self) -> bool {
        matches!(
            self,
            Value::Nil
                | Value::Bool(_)
                | Value::Int(_)
                | Value::Float(_)
                | Value::Symbol(_)
        )
    }

    /// Generic rendering, used when a value has no richer format.
    pub fn inspect(&self) -> String {
        self.inspect_with(&PrettyOptions::default())
    }

    /// Like [`Value::inspect`], laying out nested value objects with `options`.
    pub fn inspect_with(&self, options: &PrettyOptions) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::Symbol(s) => format!(":{s}"),
            Value::Str(s) => format!("{:?}", &**s),
            Value::Time(t) => format_time(t),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(|item| item.inspect_with(options)).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Map(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}=>{}", k.inspect_with(options), v.inspect_with(options)))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Object(object) => object.pretty_with(options),
            Value::Opaque(value) => format!("{value:?}"),
        }
    }
}

pub(crate) fn format_time(time: &DateTime<FixedOffset>) -> String {
    if time.timestamp_subsec_nanos() == 0 {
        time.format(TIME_FORMAT).to_string()
    } else {
        time.format(TIME_FORMAT_FRACTIONAL).to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a.eq_opaque(b.as_ref()),
            _ => false,
        }
    }
}

// Map keys need `Eq + Hash`. Floats hash by bit pattern with both zeros
// folded together; NaN keys are not
// reflexive, same as a plain `f64` comparison.
impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            // `0.0 == -0.0`, so both must hash alike.
            Value::Float(f) if *f == 0.0 => 0.0f64.to_bits().hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Symbol(s) | Value::Str(s) => s.hash(state),
            Value::Time(t) => t.hash(state),
            Value::List(items) => items.hash(state),
            Value::Map(entries) => entries.len().hash(state),
            Value::Object(object) => object.class().name().hash(state),
            Value::Opaque(_) => {}
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Time(Arc::new(value))
    }
}

impl From<DateTime<chrono::Utc>> for Value {
    fn from(value: DateTime<chrono::Utc>) -> Self {
        Value::Time(Arc::new(value.fixed_offset()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(Arc::new(value))
    }
}

impl From<ValueObject> for Value {
    fn from(value: ValueObject) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Symbol(s) | Value::Str(s) => serializer.serialize_str(s),
            Value::Time(t) => serializer.serialize_str(&t.to_rfc3339()),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries.iter() {
                    match k.as_str() {
                        Some(key) => map.serialize_entry(key, v)?,
                        None => map.serialize_entry(&k.inspect(), v)?,
                    }
                }
                map.end()
            }
            Value::Object(object) => object.serialize(serializer),
            Value::Opaque(value) => serializer.serialize_str(&format!("{value:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u8);

    #[test]
    fn clones_of_shared_values_are_identical() {
        let list = Value::list([Value::from(1)]);
        let copy = list.clone();
        assert!(list.is_identical(&copy));

        let rebuilt = Value::list([Value::from(1)]);
        assert_eq!(list, rebuilt);
        assert!(!list.is_identical(&rebuilt));
    }

    #[test]
    fn immediates_are_identical_when_equal() {
        assert!(Value::from(7).is_identical(&Value::from(7)));
        assert!(Value::symbol("red").is_identical(&Value::symbol("red")));
        assert!(!Value::from(7).is_identical(&Value::from(8)));
        assert!(!Value::string("a").is_identical(&Value::string("a")));
    }

    #[test]
    fn timestamps_have_identity() {
        let stamp = Value::parse_time("2016-02-22 09:41:29 +1100").unwrap();
        assert!(stamp.is_identical(&stamp.clone()));

        let rebuilt = Value::parse_time("2016-02-22 09:41:29 +1100").unwrap();
        assert_eq!(stamp, rebuilt);
        assert!(!stamp.is_identical(&rebuilt));
    }

    #[test]
    fn signed_zero_keys_hash_alike() {
        use std::hash::{BuildHasher, RandomState};

        let hasher = RandomState::new();
        assert_eq!(Value::from(0.0), Value::from(-0.0));
        assert_eq!(hasher.hash_one(Value::from(0.0)), hasher.hash_one(Value::from(-0.0)));

        let positive = Value::map([(Value::from(0.0), Value::from(1)), (Value::from(5), Value::from(2))]);
        let negative = Value::map([(Value::from(-0.0), Value::from(1)), (Value::from(5), Value::from(2))]);
        assert_eq!(positive, negative);
    }

    #[test]
    fn inspect_renders_literals() {
        assert_eq!(Value::Nil.inspect(), "nil");
        assert_eq!(Value::symbol("green").inspect(), ":green");
        assert_eq!(Value::string("hi \"x\"").inspect(), "\"hi \\\"x\\\"\"");
        assert_eq!(Value::from(1.5).inspect(), "1.5");
        assert_eq!(
            Value::map([(Value::symbol("foo"), Value::symbol("bar"))]).inspect(),
            "{:foo=>:bar}"
        );
        assert_eq!(Value::list([Value::from(1), Value::from(2)]).inspect(), "[1, 2]");
    }

    #[test]
    fn opaque_values_compare_through_their_type() {
        assert_eq!(Value::opaque(Marker(1)), Value::opaque(Marker(1)));
        assert_ne!(Value::opaque(Marker(1)), Value::opaque(Marker(2)));
        assert_ne!(Value::opaque(Marker(1)), Value::opaque(1u8));
        assert_eq!(Value::opaque(Marker(3)).inspect(), "Marker(3)");
    }

    #[test]
    fn time_text_parses_back() {
        let parsed = Value::parse_time("2016-02-22 09:41:29 +1100").unwrap();
        match &parsed {
            Value::Time(t) => assert_eq!(format_time(t), "2016-02-22 09:41:29 +1100"),
            other => panic!("expected time, got {other:?}"),
        }
        assert!(Value::parse_time("yesterday").is_none());
    }

    #[test]
    fn serializes_to_json() {
        let value = Value::list([
            Value::symbol("a"),
            Value::from(2),
            Value::map([(Value::symbol("k"), Value::from(true))]),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!(["a", 2, {"k": true}]));
    }
}
