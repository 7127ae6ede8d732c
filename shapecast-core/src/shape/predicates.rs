//! Structural predicates over type descriptors.

use super::{ScalarType, Type};

/// The runtime container category backing a generic collection type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// `dict`
    Map,
    /// `list`
    List,
    /// `set`
    Set,
    /// `tuple` (fixed or variable arity)
    Tuple,
}

impl Type {
    /// `true` for unions that admit the null type.
    pub fn is_optional(&self) -> bool {
        match self {
            Type::Union(members) => members.contains(&Type::NONE),
            _ => false,
        }
    }

    /// `true` for any union, optional included.
    pub fn is_union(&self) -> bool {
        matches!(self, Type::Union(_))
    }

    /// `true` for maps, lists, sets and tuples, parametrized or bare.
    pub fn is_generic_collection(&self) -> bool {
        self.extract_origin_collection().is_some()
    }

    /// The container category of a collection type.
    pub fn extract_origin_collection(&self) -> Option<CollectionKind> {
        match self {
            Type::Map(_) => Some(CollectionKind::Map),
            Type::List(_) => Some(CollectionKind::List),
            Type::Set(_) => Some(CollectionKind::Set),
            Type::Tuple(_) | Type::VarTuple(_) => Some(CollectionKind::Tuple),
            _ => None,
        }
    }

    /// The argument types of a union or collection.
    ///
    /// Types without explicit arguments (bare collections, non-generic types)
    /// yield `defaults`, so a bare `dict` can be treated as `dict[Any, Any]`.
    pub fn extract_generic(&self, defaults: &[Type]) -> Vec<Type> {
        match self {
            Type::Union(members) => members.clone(),
            Type::Map(Some(kv)) => vec![kv.0.clone(), kv.1.clone()],
            Type::List(Some(t)) | Type::Set(Some(t)) | Type::VarTuple(t) => vec![(**t).clone()],
            Type::Tuple(Some(items)) => items.clone(),
            _ => defaults.to_vec(),
        }
    }

    /// `true` for init-only wrappers.
    pub fn is_init_var(&self) -> bool {
        matches!(self, Type::InitVar(_))
    }

    /// The wrapped type of an init-only wrapper, or `self`.
    pub fn extract_init_var(&self) -> &Type {
        match self {
            Type::InitVar(inner) => inner,
            other => other,
        }
    }

    /// Subtype test, tolerant of generic forms.
    ///
    /// Collections compare their origin categories, so `list[int]` is a
    /// subclass of a bare `list`. Unions, init-only wrappers and unresolved
    /// references are never related to anything but `Any`.
    pub fn is_subclass_of(&self, other: &Type) -> bool {
        if matches!(other, Type::Any) {
            return true;
        }
        if matches!(self, Type::Union(_) | Type::InitVar(_) | Type::Ref(_))
            || matches!(other, Type::Union(_) | Type::InitVar(_) | Type::Ref(_))
        {
            return false;
        }
        if let Some(origin) = self.extract_origin_collection() {
            return other.extract_origin_collection() == Some(origin);
        }
        match (self, other) {
            (Type::Scalar(ScalarType::Bool), Type::Scalar(ScalarType::Int)) => true,
            (Type::Scalar(a), Type::Scalar(b)) => a == b,
            (Type::Record(a), Type::Record(b)) => a.is_subrecord_of(b),
            _ => false,
        }
    }
}
