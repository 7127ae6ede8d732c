use core::fmt;
use std::sync::Arc;

use crate::{Type, Value};

/// A function producing a fresh default value each time it is called.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// How a field obtains a value when the input data does not provide one.
#[derive(Clone, Default)]
pub enum FieldDefault {
    /// No default: the field is required (or skipped, for non-init fields).
    #[default]
    None,
    /// A fixed default value, cloned on use.
    Value(Value),
    /// A factory invoked on every use.
    Factory(DefaultFactory),
}

impl FieldDefault {
    /// Produce the default value, if there is one.
    pub fn resolve(&self) -> Option<Value> {
        match self {
            FieldDefault::None => None,
            FieldDefault::Value(value) => Some(value.clone()),
            FieldDefault::Factory(factory) => Some(factory()),
        }
    }

    /// `true` unless this is [`FieldDefault::None`].
    pub fn is_some(&self) -> bool {
        !matches!(self, FieldDefault::None)
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::None => f.write_str("None"),
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// One declared field of a record type.
#[derive(Clone, Debug)]
pub struct FieldDef {
    name: String,
    ty: Type,
    init: bool,
    default: FieldDefault,
}

impl FieldDef {
    /// A required init field.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            init: true,
            default: FieldDefault::None,
        }
    }

    /// Use `value` when the input has no entry for this field.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    /// Call `factory` for a fresh default whenever one is needed.
    pub fn with_default_factory(mut self, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = FieldDefault::Factory(Arc::new(factory));
        self
    }

    /// Exclude this field from the constructor; it is assigned afterwards.
    pub fn no_init(mut self) -> Self {
        self.init = false;
        self
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type, possibly containing forward references.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Whether the field is passed to the constructor.
    pub fn is_init(&self) -> bool {
        self.init
    }

    /// The default metadata.
    pub fn default(&self) -> &FieldDefault {
        &self.default
    }
}
