//! Per-call configuration.

use std::collections::HashMap;
use std::sync::Arc;

use shapecast_core::{Namespace, Type, Value};

/// A transform applied to raw input before it is built against a type.
pub type TypeHook = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// What to do with a post-construction field value when the record is frozen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FrozenAssignment {
    /// Drop the value silently.
    #[default]
    Discard,
    /// Fail with [`ErrorKind::FrozenAssignment`](crate::ErrorKind::FrozenAssignment).
    Error,
}

/// Settings for one materialization call.
///
/// The default is fully lenient apart from type checking: no hooks, no casts,
/// no extra forward references, type checks on, unknown keys ignored, first
/// matching union member wins.
#[derive(Clone)]
pub struct Config {
    type_hooks: HashMap<Type, TypeHook>,
    cast: Vec<Type>,
    forward_references: Option<Namespace>,
    check_types: bool,
    strict: bool,
    strict_unions_match: bool,
    frozen_assignment: FrozenAssignment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            type_hooks: HashMap::new(),
            cast: Vec::new(),
            forward_references: None,
            check_types: true,
            strict: false,
            strict_unions_match: false,
            frozen_assignment: FrozenAssignment::Discard,
        }
    }
}

impl Config {
    /// The default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform raw input with `hook` before building it against exactly `ty`.
    ///
    /// Hooks see the raw value only; they do not run on nested values unless
    /// those are declared with a hooked type themselves.
    pub fn type_hook(self, ty: Type, hook: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.try_type_hook(ty, move |value| Ok(hook(value)))
    }

    /// Like [`Config::type_hook`], for hooks that can reject their input.
    pub fn try_type_hook(
        mut self,
        ty: Type,
        hook: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.type_hooks.insert(ty, Arc::new(hook));
        self
    }

    /// Force values built for subclasses of `ty` through their constructor.
    pub fn cast(mut self, ty: Type) -> Self {
        self.cast.push(ty);
        self
    }

    /// Extra names available to forward references.
    pub fn forward_references(mut self, namespace: Namespace) -> Self {
        self.forward_references = Some(namespace);
        self
    }

    /// Verify every built field value against its declared type.
    pub fn check_types(mut self, enabled: bool) -> Self {
        self.check_types = enabled;
        self
    }

    /// Reject input keys that the record does not declare.
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// Require exactly one union member to match.
    pub fn strict_unions_match(mut self, enabled: bool) -> Self {
        self.strict_unions_match = enabled;
        self
    }

    /// Policy for post-construction values on frozen records.
    pub fn frozen_assignment(mut self, policy: FrozenAssignment) -> Self {
        self.frozen_assignment = policy;
        self
    }

    pub(crate) fn hook_for(&self, ty: &Type) -> Option<&TypeHook> {
        self.type_hooks.get(ty)
    }

    pub(crate) fn cast_types(&self) -> &[Type] {
        &self.cast
    }

    pub(crate) fn namespace(&self) -> Option<&Namespace> {
        self.forward_references.as_ref()
    }

    pub(crate) fn checks_types(&self) -> bool {
        self.check_types
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.strict
    }

    pub(crate) fn is_strict_unions_match(&self) -> bool {
        self.strict_unions_match
    }

    pub(crate) fn frozen_policy(&self) -> FrozenAssignment {
        self.frozen_assignment
    }
}

impl core::fmt::Debug for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("type_hooks", &self.type_hooks.keys().collect::<Vec<_>>())
            .field("cast", &self.cast)
            .field("forward_references", &self.forward_references)
            .field("check_types", &self.check_types)
            .field("strict", &self.strict)
            .field("strict_unions_match", &self.strict_unions_match)
            .field("frozen_assignment", &self.frozen_assignment)
            .finish()
    }
}
