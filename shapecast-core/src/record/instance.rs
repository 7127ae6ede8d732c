use core::fmt;

use super::RecordType;
use crate::{VObject, Value};

/// A built record: its type plus its stored field values.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    record: RecordType,
    fields: VObject,
}

impl Instance {
    pub(crate) fn new(record: RecordType, fields: VObject) -> Self {
        Self { record, fields }
    }

    /// The record type this is an instance of.
    pub fn record(&self) -> &RecordType {
        &self.record
    }

    /// `true` if this instance's type is `record` or one of its descendants.
    pub fn is_instance_of(&self, record: &RecordType) -> bool {
        self.record.is_subrecord_of(record)
    }

    /// Look up a stored field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All stored fields, in declaration order.
    pub fn fields(&self) -> &VObject {
        &self.fields
    }

    /// Consume the instance, returning its stored fields.
    pub fn into_fields(self) -> VObject {
        self.fields
    }

    /// Assign a field after construction.
    ///
    /// Fails on frozen records.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Result<(), FrozenInstanceError> {
        let name = name.into();
        if self.record.is_frozen() {
            return Err(FrozenInstanceError {
                record: self.record.name().to_string(),
                field: name,
            });
        }
        self.fields.insert(name, value);
        Ok(())
    }

    /// Flatten into a plain map, recursively converting nested instances.
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.flatten()))
                .collect(),
        )
    }
}

/// Returned when assigning to a field of a frozen record instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenInstanceError {
    /// Name of the frozen record type.
    pub record: String,
    /// The field that could not be assigned.
    pub field: String,
}

impl fmt::Display for FrozenInstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot assign to field `{}` of frozen record `{}`",
            self.field, self.record
        )
    }
}

impl core::error::Error for FrozenInstanceError {}
