//! Type descriptors.
//!
//! A [`Type`] is the engine's representation of a declared field type. It is
//! a closed enum: every category the engine knows how to build has exactly one
//! variant, and all dispatch is an exhaustive `match`.

use core::fmt::{self, Display, Formatter};

use crate::record::RecordType;

mod predicates;

pub use predicates::CollectionKind;

/// Scalar (leaf) types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarType {
    /// The type of the null sentinel
    None,
    /// Booleans
    Bool,
    /// Integers (booleans are accepted as integers)
    Int,
    /// Floats
    Float,
    /// Strings
    Str,
    /// Binary data
    Bytes,
}

impl ScalarType {
    /// The name used when displaying types.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::None => "None",
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Str => "str",
            ScalarType::Bytes => "bytes",
        }
    }
}

/// A declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Unconstrained: every value matches, nothing is converted.
    Any,

    /// A leaf type.
    Scalar(ScalarType),

    /// A user record type.
    Record(RecordType),

    /// A union of member types, in declaration order.
    ///
    /// Build with [`Type::union`] or [`Type::optional`], which flatten nested
    /// unions and drop duplicate members.
    Union(Vec<Type>),

    /// String-keyed mapping; `None` for a bare mapping (`dict[Any, Any]`).
    Map(Option<Box<(Type, Type)>>),

    /// Homogeneous list; `None` for a bare list.
    List(Option<Box<Type>>),

    /// Homogeneous set; `None` for a bare set.
    Set(Option<Box<Type>>),

    /// Fixed-arity tuple with positional types; `None` for a bare tuple.
    Tuple(Option<Vec<Type>>),

    /// Variable-arity tuple where every element has the same type
    /// (`tuple[T, ...]`).
    VarTuple(Box<Type>),

    /// Init-only field: passed to the record constructor but not stored.
    InitVar(Box<Type>),

    /// A forward reference by name, resolved before the type is used.
    Ref(String),
}

impl Type {
    /// `Any`
    pub const ANY: Type = Type::Any;
    /// The null type
    pub const NONE: Type = Type::Scalar(ScalarType::None);
    /// `bool`
    pub const BOOL: Type = Type::Scalar(ScalarType::Bool);
    /// `int`
    pub const INT: Type = Type::Scalar(ScalarType::Int);
    /// `float`
    pub const FLOAT: Type = Type::Scalar(ScalarType::Float);
    /// `str`
    pub const STR: Type = Type::Scalar(ScalarType::Str);
    /// `bytes`
    pub const BYTES: Type = Type::Scalar(ScalarType::Bytes);

    /// A record type.
    pub fn record(record: &RecordType) -> Type {
        Type::Record(record.clone())
    }

    /// A union of `members`. Nested unions are flattened and duplicates
    /// removed, keeping the first occurrence. A single remaining member is
    /// returned as-is.
    pub fn union(members: impl IntoIterator<Item = Type>) -> Type {
        let mut flat: Vec<Type> = Vec::new();
        for member in members {
            match member {
                Type::Union(inner) => {
                    for t in inner {
                        if !flat.contains(&t) {
                            flat.push(t);
                        }
                    }
                }
                t => {
                    if !flat.contains(&t) {
                        flat.push(t);
                    }
                }
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Type::Union(flat)
        }
    }

    /// `T | None`
    pub fn optional(inner: Type) -> Type {
        Type::union([inner, Type::NONE])
    }

    /// `dict[K, V]`
    pub fn map(key: Type, value: Type) -> Type {
        Type::Map(Some(Box::new((key, value))))
    }

    /// `list[T]`
    pub fn list(item: Type) -> Type {
        Type::List(Some(Box::new(item)))
    }

    /// `set[T]`
    pub fn set(item: Type) -> Type {
        Type::Set(Some(Box::new(item)))
    }

    /// `tuple[A, B, ...]` with a fixed number of positions.
    pub fn tuple(items: impl IntoIterator<Item = Type>) -> Type {
        Type::Tuple(Some(items.into_iter().collect()))
    }

    /// `tuple[T, ...]`
    pub fn var_tuple(item: Type) -> Type {
        Type::VarTuple(Box::new(item))
    }

    /// An init-only wrapper around `inner`.
    pub fn init_var(inner: Type) -> Type {
        Type::InitVar(Box::new(inner))
    }

    /// A forward reference to a type registered under `name`.
    pub fn forward(name: impl Into<String>) -> Type {
        Type::Ref(name.into())
    }

    /// Apply `f` to every direct child type, rebuilding this type.
    ///
    /// Records are leaves: their fields are not visited.
    pub fn try_map_children<E>(
        &self,
        f: &mut impl FnMut(&Type) -> Result<Type, E>,
    ) -> Result<Type, E> {
        Ok(match self {
            Type::Any | Type::Scalar(_) | Type::Record(_) | Type::Ref(_) => self.clone(),
            Type::Union(members) => Type::Union(members.iter().map(&mut *f).collect::<Result<_, _>>()?),
            Type::Map(args) => Type::Map(match args {
                Some(kv) => Some(Box::new((f(&kv.0)?, f(&kv.1)?))),
                None => None,
            }),
            Type::List(arg) => Type::List(match arg {
                Some(t) => Some(Box::new(f(t)?)),
                None => None,
            }),
            Type::Set(arg) => Type::Set(match arg {
                Some(t) => Some(Box::new(f(t)?)),
                None => None,
            }),
            Type::Tuple(args) => Type::Tuple(match args {
                Some(items) => Some(items.iter().map(&mut *f).collect::<Result<_, _>>()?),
                None => None,
            }),
            Type::VarTuple(t) => Type::VarTuple(Box::new(f(t)?)),
            Type::InitVar(t) => Type::InitVar(Box::new(f(t)?)),
        })
    }
}

impl From<ScalarType> for Type {
    fn from(value: ScalarType) -> Self {
        Type::Scalar(value)
    }
}

impl From<&RecordType> for Type {
    fn from(value: &RecordType) -> Self {
        Type::Record(value.clone())
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => f.write_str("Any"),
            Type::Scalar(scalar) => f.write_str(scalar.name()),
            Type::Record(record) => f.write_str(record.name()),
            Type::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Type::Map(None) => f.write_str("dict"),
            Type::Map(Some(kv)) => write!(f, "dict[{}, {}]", kv.0, kv.1),
            Type::List(None) => f.write_str("list"),
            Type::List(Some(t)) => write!(f, "list[{t}]"),
            Type::Set(None) => f.write_str("set"),
            Type::Set(Some(t)) => write!(f, "set[{t}]"),
            Type::Tuple(None) => f.write_str("tuple"),
            Type::Tuple(Some(items)) if items.is_empty() => f.write_str("tuple[()]"),
            Type::Tuple(Some(items)) => {
                f.write_str("tuple[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Type::VarTuple(t) => write!(f, "tuple[{t}, ...]"),
            Type::InitVar(t) => write!(f, "InitVar[{t}]"),
            Type::Ref(name) => write!(f, "'{name}'"),
        }
    }
}
