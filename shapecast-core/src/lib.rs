#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod value;
pub use value::{VObject, VSet, Value, ValueType};

mod shape;
pub use shape::{CollectionKind, ScalarType, Type};

mod record;
pub use record::{
    ConstructError, DefaultFactory, FieldDef, FieldDefault, FrozenInstanceError, Instance,
    Namespace, PostInit, RecordBuilder, RecordDef, RecordType,
};
