//! Record materialization: a mapping in, a record instance out.

use shapecast_core::{FieldDef, Instance, RecordType, Type, VObject, Value};

use crate::build::Builder;
use crate::config::FrozenAssignment;
use crate::error::{DeserializeError, ErrorKind, FieldSuggestion};
use crate::matcher::is_instance;
use crate::tracing_macros::{debug, trace};

impl Builder<'_> {
    /// Build an instance of `record` from `data`, which must be a map.
    pub(crate) fn materialize(
        &self,
        record: &RecordType,
        data: &Value,
    ) -> Result<Instance, DeserializeError> {
        let Value::Map(data) = data else {
            return Err(ErrorKind::WrongType {
                expected: Type::record(record),
                value: data.clone(),
            }
            .into());
        };
        debug!(record = record.name(), keys = data.len(), "materializing");

        let reflector = self.engine.reflector();
        let cache = self.engine.cache();
        let hints = cache
            .hints(reflector, record, self.config.namespace())
            .map_err(|unresolved| ErrorKind::ForwardReference {
                name: unresolved.name,
            })?;
        let fields = cache.fields(reflector, record);

        if self.config.is_strict() {
            reject_extra_keys(record, &fields, data)?;
        }

        let frozen = record.is_frozen() || reflector.is_frozen(record);
        let mut init_values = VObject::new();
        let mut assignments: Vec<(&str, Value)> = Vec::new();

        for field in fields.iter() {
            let name = field.name();
            let ty = hints.get(name).unwrap_or(field.ty());

            let (value, from_input) = match data.get(name) {
                Some(raw) => {
                    let value = self
                        .build(ty, raw)
                        .map_err(|err| err.with_field(name))?;
                    if self.config.checks_types() && !is_instance(&value, ty) {
                        return Err(DeserializeError::new(ErrorKind::WrongType {
                            expected: ty.clone(),
                            value,
                        })
                        .with_field(name));
                    }
                    (value, true)
                }
                None => match default_value(field, ty) {
                    Some(value) => (value, false),
                    None if !field.is_init() => continue,
                    None => {
                        return Err(DeserializeError::new(ErrorKind::MissingValue).with_field(name));
                    }
                },
            };

            if field.is_init() {
                init_values.insert(name.to_string(), value);
            } else if !frozen {
                assignments.push((name, value));
            } else if from_input && self.config.frozen_policy() == FrozenAssignment::Error {
                return Err(DeserializeError::new(ErrorKind::FrozenAssignment {
                    record: record.name().to_string(),
                })
                .with_field(name));
            } else {
                trace!(record = record.name(), field = name, "discarding value for frozen record");
            }
        }

        let mut instance =
            record
                .construct(init_values)
                .map_err(|err| ErrorKind::Construct {
                    record: record.name().to_string(),
                    message: err.to_string(),
                })?;

        for (name, value) in assignments {
            instance.set(name, value).map_err(|_| {
                DeserializeError::new(ErrorKind::FrozenAssignment {
                    record: record.name().to_string(),
                })
                .with_field(name)
            })?;
        }

        Ok(instance)
    }
}

/// The value for a field absent from the input: its default, a fresh value
/// from its factory, or null for optional types.
fn default_value(field: &FieldDef, ty: &Type) -> Option<Value> {
    field
        .default()
        .resolve()
        .or_else(|| ty.is_optional().then_some(Value::Null))
}

fn reject_extra_keys(
    record: &RecordType,
    fields: &[FieldDef],
    data: &VObject,
) -> Result<(), DeserializeError> {
    let mut keys: Vec<String> = data
        .keys()
        .filter(|key| !fields.iter().any(|field| field.name() == key.as_str()))
        .cloned()
        .collect();
    if keys.is_empty() {
        return Ok(());
    }
    keys.sort();
    let suggestions = compute_suggestions(&keys, fields);
    Err(ErrorKind::UnexpectedData {
        record: record.name().to_string(),
        keys,
        suggestions,
    }
    .into())
}

/// For each unknown key, the most similar declared field, if any is close
/// enough.
#[cfg(feature = "suggestions")]
fn compute_suggestions(unknown_keys: &[String], fields: &[FieldDef]) -> Vec<FieldSuggestion> {
    const SIMILARITY_THRESHOLD: f64 = 0.6;

    let mut suggestions = Vec::new();

    for unknown in unknown_keys {
        let mut best_match: Option<(&str, f64)> = None;

        for field in fields {
            let similarity = strsim::jaro_winkler(unknown, field.name());
            if similarity >= SIMILARITY_THRESHOLD
                && best_match.is_none_or(|(_, best_sim)| similarity > best_sim)
            {
                best_match = Some((field.name(), similarity));
            }
        }

        if let Some((suggestion, similarity)) = best_match {
            suggestions.push(FieldSuggestion {
                unknown: unknown.clone(),
                suggestion: suggestion.to_string(),
                similarity,
            });
        }
    }

    suggestions
}

#[cfg(not(feature = "suggestions"))]
fn compute_suggestions(_unknown_keys: &[String], _fields: &[FieldDef]) -> Vec<FieldSuggestion> {
    Vec::new()
}
