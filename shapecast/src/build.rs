//! Type-directed value construction.
//!
//! [`Builder::build`] takes a declared [`Type`] and a raw [`Value`] and
//! returns the value to store in a record field. The order of operations is
//! fixed: init-only unwrapping, the type hook, the optional short-circuit,
//! then one of union resolution, collection rebuilding or nested record
//! materialization, and finally the cast pass.

use shapecast_core::{CollectionKind, Type, VObject, Value};

use crate::cast;
use crate::config::Config;
use crate::engine::Engine;
use crate::error::{DeserializeError, ErrorKind};
use crate::matcher::is_instance;
use crate::tracing_macros::trace;

/// State shared by one materialization call.
pub(crate) struct Builder<'a> {
    pub(crate) engine: &'a Engine,
    pub(crate) config: &'a Config,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(engine: &'a Engine, config: &'a Config) -> Self {
        Self { engine, config }
    }

    /// Build `raw` against `ty`.
    pub(crate) fn build(&self, ty: &Type, raw: &Value) -> Result<Value, DeserializeError> {
        let ty = ty.extract_init_var();

        let hooked;
        let data = match self.config.hook_for(ty) {
            Some(hook) => {
                trace!(ty = %ty, "applying type hook");
                hooked = hook(raw).map_err(|message| ErrorKind::Hook {
                    ty: ty.clone(),
                    message,
                })?;
                &hooked
            }
            None => raw,
        };

        if ty.is_optional() && data.is_null() {
            return Ok(Value::Null);
        }

        let built = match ty {
            Type::Union(members) => self.build_union(ty, members, data)?,
            Type::Record(record) if matches!(data, Value::Map(_)) => {
                Value::Record(self.materialize(record, data)?)
            }
            _ if ty.is_generic_collection() => self.build_collection(ty, data)?,
            _ => data.clone(),
        };

        self.cast(ty, built)
    }

    fn build_union(
        &self,
        union: &Type,
        members: &[Type],
        data: &Value,
    ) -> Result<Value, DeserializeError> {
        if union.is_optional()
            && members.len() == 2
            && let Some(inner) = members.iter().find(|member| **member != Type::NONE)
        {
            return self.build(inner, data);
        }

        let strict = self.config.is_strict_unions_match();
        let mut matches: Vec<(Type, Value)> = Vec::new();
        for member in members {
            let value = match self.build(member, data) {
                Ok(value) => value,
                Err(_err) => {
                    trace!(member = %member, error = %_err, "union member rejected");
                    continue;
                }
            };
            if !is_instance(&value, member) {
                continue;
            }
            if !strict {
                return Ok(value);
            }
            matches.push((member.clone(), value));
        }

        match matches.len() {
            0 => {}
            1 => {
                if let Some((_, value)) = matches.pop() {
                    return Ok(value);
                }
            }
            _ => return Err(ErrorKind::StrictUnionMatch { matches }.into()),
        }

        if !self.config.checks_types() {
            return Ok(data.clone());
        }
        Err(ErrorKind::UnionMatch {
            union: union.clone(),
            value: data.clone(),
        }
        .into())
    }

    fn build_collection(&self, ty: &Type, data: &Value) -> Result<Value, DeserializeError> {
        let origin = ty.extract_origin_collection();
        match data {
            Value::Map(map) if origin == Some(CollectionKind::Map) => {
                let item = ty
                    .extract_generic(&[Type::ANY, Type::ANY])
                    .pop()
                    .unwrap_or(Type::ANY);
                map.iter()
                    .map(|(key, value)| Ok((key.clone(), self.build(&item, value)?)))
                    .collect::<Result<VObject, _>>()
                    .map(Value::Map)
            }
            Value::Tuple(items) if origin == Some(CollectionKind::Tuple) => {
                if items.is_empty() {
                    return Ok(Value::Tuple(Vec::new()));
                }
                if let Type::VarTuple(item) = ty {
                    return self.build_all(item, items).map(Value::Tuple);
                }
                self.build_positional(&ty.extract_generic(&[]), items)
                    .map(Value::Tuple)
            }
            Value::List(_) | Value::Tuple(_) | Value::Set(_) if origin != Some(CollectionKind::Map) => {
                let item = ty
                    .extract_generic(&[Type::ANY])
                    .into_iter()
                    .next()
                    .unwrap_or(Type::ANY);
                Ok(match data {
                    Value::List(items) => Value::List(self.build_all(&item, items)?),
                    Value::Tuple(items) => Value::Tuple(self.build_all(&item, items)?),
                    Value::Set(set) => Value::Set(
                        set.iter()
                            .map(|value| self.build(&item, value))
                            .collect::<Result<_, _>>()?,
                    ),
                    _ => data.clone(),
                })
            }
            _ => Ok(data.clone()),
        }
    }

    fn build_all(&self, item: &Type, values: &[Value]) -> Result<Vec<Value>, DeserializeError> {
        values.iter().map(|value| self.build(item, value)).collect()
    }

    /// Pair values with positional types. Missing values are built from
    /// null; values beyond the declared positions are kept as they are.
    fn build_positional(
        &self,
        types: &[Type],
        values: &[Value],
    ) -> Result<Vec<Value>, DeserializeError> {
        (0..values.len().max(types.len()))
            .map(|i| match (values.get(i), types.get(i)) {
                (value, Some(ty)) => self.build(ty, value.unwrap_or(&Value::Null)),
                (value, None) => Ok(value.cloned().unwrap_or_default()),
            })
            .collect()
    }

    /// Force `value` through `ty`'s constructor if `ty` falls under an entry
    /// of the cast list. Only the first matching entry counts.
    fn cast(&self, ty: &Type, value: Value) -> Result<Value, DeserializeError> {
        let Some(_entry) = self
            .config
            .cast_types()
            .iter()
            .find(|entry| ty.is_subclass_of(entry))
        else {
            return Ok(value);
        };
        trace!(ty = %ty, entry = %_entry, "casting");
        cast::construct(ty, &value).map_err(|message| {
            ErrorKind::Cast {
                target: ty.clone(),
                value,
                message,
            }
            .into()
        })
    }
}
