//! Dynamic values: the untyped input data and the built output.

use indexmap::IndexMap;

use crate::record::Instance;

mod format;
mod macros;
mod set;

pub use set::VSet;

/// An insertion-ordered mapping from string keys to values.
pub type VObject = IndexMap<String, Value>;

/// Enum distinguishing the value types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// Null value (the "absent" sentinel)
    Null,
    /// Boolean value
    Bool,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// String (UTF-8)
    String,
    /// Binary data
    Bytes,
    /// Variable-length ordered sequence
    List,
    /// Fixed ordered sequence
    Tuple,
    /// Unique, unordered collection
    Set,
    /// Key-value map with string keys
    Map,
    /// A built record instance
    Record,
}

impl ValueType {
    /// Short lowercase name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "str",
            ValueType::Bytes => "bytes",
            ValueType::List => "list",
            ValueType::Tuple => "tuple",
            ValueType::Set => "set",
            ValueType::Map => "map",
            ValueType::Record => "record",
        }
    }
}

impl core::fmt::Display for ValueType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamic value: null, booleans, numbers, strings, bytes, sequences, maps
/// or record instances.
///
/// Input data handed to the engine is a tree of these; the engine never
/// mutates it and produces fresh values for everything it builds.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// The "absent" sentinel
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Ordered sequence
    List(Vec<Value>),
    /// Fixed ordered sequence
    Tuple(Vec<Value>),
    /// Unique collection
    Set(VSet),
    /// String-keyed map
    Map(VObject),
    /// Built record instance
    Record(Instance),
}

impl Value {
    /// Build a list from an iterator of values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a tuple from an iterator of values.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a set from an iterator of values. Duplicates are dropped.
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    /// Returns the type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Bytes(_) => ValueType::Bytes,
            Value::List(_) => ValueType::List,
            Value::Tuple(_) => ValueType::Tuple,
            Value::Set(_) => ValueType::Set,
            Value::Map(_) => ValueType::Map,
            Value::Record(_) => ValueType::Record,
        }
    }

    /// Returns `true` if this is the null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for lists, tuples and sets.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::List(_) | Value::Tuple(_) | Value::Set(_))
    }

    /// Returns the boolean if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an int.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float if this is a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the map if this is a map.
    pub fn as_object(&self) -> Option<&VObject> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the record instance if this is one.
    pub fn as_record(&self) -> Option<&Instance> {
        match self {
            Value::Record(instance) => Some(instance),
            _ => None,
        }
    }

    /// Returns the elements of a list, tuple or set, in iteration order.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            Value::Set(set) => Some(set.as_slice()),
            _ => None,
        }
    }

    /// Recursively convert every record instance into a plain map.
    ///
    /// The result contains no [`Value::Record`] and can be fed back into the
    /// engine to rebuild an equal instance.
    pub fn flatten(&self) -> Value {
        match self {
            Value::Record(instance) => instance.to_value(),
            Value::List(items) => Value::List(items.iter().map(Value::flatten).collect()),
            Value::Tuple(items) => Value::Tuple(items.iter().map(Value::flatten).collect()),
            Value::Set(set) => Value::Set(set.iter().map(Value::flatten).collect()),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.flatten()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Python-style truthiness: null, `false`, zero, and empty containers are
    /// falsy. Records are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(x) => *x != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Set(set) => !set.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Record(_) => true,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<VSet> for Value {
    fn from(value: VSet) -> Self {
        Value::Set(value)
    }
}

impl From<VObject> for Value {
    fn from(value: VObject) -> Self {
        Value::Map(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Value::Record(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
