//! Record types: explicitly registered composite types with named fields.
//!
//! A [`RecordType`] is a cheap-to-clone handle with identity semantics: two
//! handles are equal only if they come from the same [`RecordBuilder::build`]
//! call, regardless of name or fields.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::VObject;

mod field;
mod instance;
mod namespace;

pub use field::{DefaultFactory, FieldDef, FieldDefault};
pub use instance::{FrozenInstanceError, Instance};
pub use namespace::Namespace;

/// Hook run at the end of construction with the stored fields and the values
/// of init-only fields.
pub type PostInit = Arc<dyn Fn(&mut VObject, &VObject) -> Result<(), String> + Send + Sync>;

/// The definition behind a [`RecordType`] handle.
pub struct RecordDef {
    name: String,
    fields: Vec<FieldDef>,
    frozen: bool,
    namespace: Option<Namespace>,
    parent: Option<RecordType>,
    post_init: Option<PostInit>,
}

/// Handle to a registered record type.
#[derive(Clone)]
pub struct RecordType(Arc<RecordDef>);

impl RecordType {
    /// Start defining a record type called `name`.
    pub fn builder(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            name: name.into(),
            fields: Vec::new(),
            frozen: false,
            namespace: None,
            parent: None,
            post_init: None,
        }
    }

    /// The record name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// All fields in declaration order, inherited fields first.
    pub fn fields(&self) -> &[FieldDef] {
        &self.0.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.0.fields.iter().find(|f| f.name() == name)
    }

    /// Whether instances reject assignment after construction.
    pub fn is_frozen(&self) -> bool {
        self.0.frozen
    }

    /// Types this record's own field declarations may refer to by name.
    pub fn namespace(&self) -> Option<&Namespace> {
        self.0.namespace.as_ref()
    }

    /// The record this one extends.
    pub fn parent(&self) -> Option<&RecordType> {
        self.0.parent.as_ref()
    }

    /// This record followed by its parent chain.
    pub fn ancestors(&self) -> impl Iterator<Item = &RecordType> {
        core::iter::successors(Some(self), |r| r.parent())
    }

    /// `true` if `other` is this record or one of its ancestors.
    pub fn is_subrecord_of(&self, other: &RecordType) -> bool {
        self.ancestors().any(|r| r == other)
    }

    /// Create an instance from constructor arguments.
    ///
    /// `init` must hold a value for every init field without a default and
    /// nothing else. Init-only fields are handed to the post-init hook and not
    /// stored; non-init fields with a default are filled in.
    pub fn construct(&self, mut init: VObject) -> Result<Instance, ConstructError> {
        let mut fields = VObject::new();
        let mut init_vars = VObject::new();

        for field in self.fields() {
            if field.is_init() {
                let value = match init.shift_remove(field.name()) {
                    Some(value) => value,
                    None => field
                        .default()
                        .resolve()
                        .ok_or_else(|| ConstructError::MissingArgument(field.name().to_string()))?,
                };
                if field.ty().is_init_var() {
                    init_vars.insert(field.name().to_string(), value);
                } else {
                    fields.insert(field.name().to_string(), value);
                }
            } else if let Some(value) = field.default().resolve() {
                fields.insert(field.name().to_string(), value);
            }
        }

        if let Some((name, _)) = init.first() {
            return Err(ConstructError::UnexpectedArgument(name.clone()));
        }

        if let Some(hook) = &self.0.post_init {
            hook(&mut fields, &init_vars).map_err(ConstructError::PostInit)?;
        }

        Ok(Instance::new(self.clone(), fields))
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.0.name).finish()
    }
}

/// Builder returned by [`RecordType::builder`].
pub struct RecordBuilder {
    name: String,
    fields: Vec<FieldDef>,
    frozen: bool,
    namespace: Option<Namespace>,
    parent: Option<RecordType>,
    post_init: Option<PostInit>,
}

impl RecordBuilder {
    /// Add a required init field.
    pub fn field(self, name: impl Into<String>, ty: crate::Type) -> Self {
        self.field_def(FieldDef::new(name, ty))
    }

    /// Add a field. A field with the same name as an earlier or inherited one
    /// replaces it in place.
    pub fn field_def(mut self, field: FieldDef) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Make instances immutable after construction.
    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    /// Types the field declarations may refer to with [`crate::Type::Ref`].
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Inherit fields (and the post-init hook, unless one is set) from `parent`.
    pub fn extends(mut self, parent: &RecordType) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Run `hook` at the end of every construction.
    pub fn post_init(
        mut self,
        hook: impl Fn(&mut VObject, &VObject) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.post_init = Some(Arc::new(hook));
        self
    }

    /// Finish the definition.
    pub fn build(self) -> RecordType {
        let mut fields = match &self.parent {
            Some(parent) => parent.fields().to_vec(),
            None => Vec::new(),
        };
        for field in self.fields {
            match fields.iter_mut().find(|f| f.name() == field.name()) {
                Some(slot) => *slot = field,
                None => fields.push(field),
            }
        }
        let post_init = self
            .post_init
            .or_else(|| self.parent.as_ref().and_then(|p| p.0.post_init.clone()));

        RecordType(Arc::new(RecordDef {
            name: self.name,
            fields,
            frozen: self.frozen,
            namespace: self.namespace,
            parent: self.parent,
            post_init,
        }))
    }
}

/// Returned when [`RecordType::construct`] cannot create an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructError {
    /// An init field without a default received no argument.
    MissingArgument(String),
    /// An argument does not name an init field.
    UnexpectedArgument(String),
    /// The post-init hook failed.
    PostInit(String),
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructError::MissingArgument(name) => write!(f, "missing argument `{name}`"),
            ConstructError::UnexpectedArgument(name) => write!(f, "unexpected argument `{name}`"),
            ConstructError::PostInit(message) => write!(f, "post-init failed: {message}"),
        }
    }
}

impl core::error::Error for ConstructError {}
