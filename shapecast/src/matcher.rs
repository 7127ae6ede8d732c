//! Does a value conform to a type?

use shapecast_core::{ScalarType, Type, Value};

/// Returns `true` if `value` conforms to `ty`.
///
/// Containers are checked element by element (map keys are not checked);
/// union members are tried in declaration order. Record instances are matched
/// by type identity, including descendants, without re-checking their fields.
pub fn is_instance(value: &Value, ty: &Type) -> bool {
    match ty {
        Type::Any => true,
        Type::InitVar(inner) => is_instance(value, inner),
        Type::Ref(_) => false,
        Type::Union(members) => members.iter().any(|member| is_instance(value, member)),
        Type::Scalar(scalar) => is_scalar_instance(value, *scalar),
        Type::Record(record) => matches!(value, Value::Record(instance) if instance.is_instance_of(record)),
        Type::Map(args) => match value {
            Value::Map(map) => match args {
                Some(kv) => map.values().all(|v| is_instance(v, &kv.1)),
                None => true,
            },
            _ => false,
        },
        Type::Tuple(Some(items)) => match value {
            Value::Tuple(elements) => {
                elements.len() == items.len()
                    && elements.iter().zip(items).all(|(v, t)| is_instance(v, t))
            }
            _ => false,
        },
        Type::Tuple(None) => matches!(value, Value::Tuple(_)),
        Type::VarTuple(item) => match value {
            Value::Tuple(elements) => elements.iter().all(|v| is_instance(v, item)),
            _ => false,
        },
        Type::List(arg) => match value {
            Value::List(elements) => all_match(elements, arg.as_deref()),
            _ => false,
        },
        Type::Set(arg) => match value {
            Value::Set(set) => all_match(set.as_slice(), arg.as_deref()),
            _ => false,
        },
    }
}

fn all_match(elements: &[Value], item: Option<&Type>) -> bool {
    match item {
        Some(t) => elements.iter().all(|v| is_instance(v, t)),
        None => true,
    }
}

fn is_scalar_instance(value: &Value, scalar: ScalarType) -> bool {
    match scalar {
        ScalarType::None => matches!(value, Value::Null),
        ScalarType::Bool => matches!(value, Value::Bool(_)),
        ScalarType::Int => matches!(value, Value::Int(_) | Value::Bool(_)),
        ScalarType::Float => matches!(value, Value::Float(_)),
        ScalarType::Str => matches!(value, Value::String(_)),
        ScalarType::Bytes => matches!(value, Value::Bytes(_)),
    }
}
