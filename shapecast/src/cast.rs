//! Constructor semantics for forced conversions.
//!
//! Each type's "constructor" accepts a handful of input categories and
//! converts them; anything else is rejected with a short reason.

use shapecast_core::{ScalarType, Type, VObject, Value};

/// Convert `value` the way constructing `ty` from it would.
///
/// Generic collections use their container constructor: element types are not
/// consulted.
pub(crate) fn construct(ty: &Type, value: &Value) -> Result<Value, String> {
    match ty {
        Type::Any | Type::Union(_) | Type::InitVar(_) | Type::Ref(_) => Ok(value.clone()),
        Type::Scalar(scalar) => construct_scalar(*scalar, value),
        Type::Record(record) => match value {
            Value::Record(instance) if instance.is_instance_of(record) => Ok(value.clone()),
            _ => Err(format!("expected an instance of `{}`", record.name())),
        },
        Type::Map(_) => construct_map(value),
        Type::List(_) => elements(value).map(Value::List),
        Type::Tuple(_) | Type::VarTuple(_) => elements(value).map(Value::Tuple),
        Type::Set(_) => elements(value).map(|items| Value::Set(items.into_iter().collect())),
    }
}

fn construct_scalar(scalar: ScalarType, value: &Value) -> Result<Value, String> {
    match scalar {
        ScalarType::None => match value {
            Value::Null => Ok(Value::Null),
            _ => Err("only null converts to None".into()),
        },
        ScalarType::Bool => Ok(Value::Bool(value.is_truthy())),
        ScalarType::Int => to_int(value).map(Value::Int),
        ScalarType::Float => to_float(value).map(Value::Float),
        ScalarType::Str => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => Ok(Value::String(value.to_string())),
            other => Err(format!("{} is not convertible to a string", other.value_type())),
        },
        ScalarType::Bytes => to_bytes(value).map(Value::Bytes),
    }
}

fn to_int(value: &Value) -> Result<i64, String> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Float(x) if x.is_finite() => {
            let truncated = x.trunc();
            if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                Ok(truncated as i64)
            } else {
                Err(format!("{x} is out of range"))
            }
        }
        Value::Float(x) => Err(format!("{x} has no integer value")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid integer literal {s:?}")),
        other => Err(format!("{} is not convertible to an integer", other.value_type())),
    }
}

fn to_float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Float(x) => Ok(*x),
        Value::Int(i) => Ok(*i as f64),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid float literal {s:?}")),
        other => Err(format!("{} is not convertible to a float", other.value_type())),
    }
}

fn to_bytes(value: &Value) -> Result<Vec<u8>, String> {
    match value {
        Value::Bytes(bytes) => Ok(bytes.clone()),
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        Value::List(items) | Value::Tuple(items) => items
            .iter()
            .map(|item| match item {
                Value::Int(i) => u8::try_from(*i).map_err(|_| format!("byte {i} is out of range")),
                other => Err(format!("{} is not a byte", other.value_type())),
            })
            .collect(),
        other => Err(format!("{} is not convertible to bytes", other.value_type())),
    }
}

/// Elements of a sequence, or the keys of a map.
fn elements(value: &Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Map(map) => Ok(map.keys().map(|key| Value::String(key.clone())).collect()),
        other => other
            .as_elements()
            .map(<[Value]>::to_vec)
            .ok_or_else(|| format!("{} is not iterable", other.value_type())),
    }
}

fn construct_map(value: &Value) -> Result<Value, String> {
    if let Value::Map(_) = value {
        return Ok(value.clone());
    }
    let Some(pairs) = value.as_elements() else {
        return Err(format!("{} is not convertible to a map", value.value_type()));
    };
    let mut map = VObject::with_capacity(pairs.len());
    for pair in pairs {
        match pair.as_elements() {
            Some([Value::String(key), item]) => {
                map.insert(key.clone(), item.clone());
            }
            _ => return Err(format!("{pair} is not a (str, value) pair")),
        }
    }
    Ok(Value::Map(map))
}
