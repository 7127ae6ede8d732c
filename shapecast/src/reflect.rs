//! Field introspection and forward-reference resolution.
//!
//! The engine never looks inside a [`RecordType`] directly; it asks a
//! [`Reflector`] for the field list and for the resolved type of every field.
//! Both answers are cached by [`ReflectCache`](crate::ReflectCache).

use indexmap::IndexMap;
use shapecast_core::{FieldDef, Namespace, RecordType, Type};

/// Resolved field types of one record, keyed by field name.
pub type Hints = IndexMap<String, Type>;

/// A forward reference that no namespace could resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// The missing name.
    pub name: String,
}

/// Answers questions about record types.
pub trait Reflector: Send + Sync {
    /// The record's fields in declaration order.
    fn fields(&self, record: &RecordType) -> Vec<FieldDef>;

    /// The record's field types with every forward reference resolved.
    ///
    /// `namespace` holds extra names supplied by the caller's configuration.
    fn resolve_hints(
        &self,
        record: &RecordType,
        namespace: Option<&Namespace>,
    ) -> Result<Hints, UnresolvedReference>;

    /// Whether values for non-init fields of `record` are withheld after
    /// construction.
    ///
    /// This can only add frozenness: a record declared frozen rejects
    /// assignment whatever this returns.
    fn is_frozen(&self, record: &RecordType) -> bool {
        record.is_frozen()
    }
}

/// Reads registered record definitions.
///
/// A [`Type::Ref`] is looked up in the configured namespace first, then in the
/// namespaces of the record and its ancestors, and finally against the names
/// of the record and its ancestors, so a record can refer to itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultReflector;

impl Reflector for DefaultReflector {
    fn fields(&self, record: &RecordType) -> Vec<FieldDef> {
        record.fields().to_vec()
    }

    fn resolve_hints(
        &self,
        record: &RecordType,
        namespace: Option<&Namespace>,
    ) -> Result<Hints, UnresolvedReference> {
        record
            .fields()
            .iter()
            .map(|field| {
                let ty = resolve_type(field.ty(), record, namespace)?;
                Ok((field.name().to_string(), ty))
            })
            .collect()
    }
}

/// Replace every forward reference inside `ty`. Record types are leaves.
pub fn resolve_type(
    ty: &Type,
    record: &RecordType,
    namespace: Option<&Namespace>,
) -> Result<Type, UnresolvedReference> {
    resolve_with_stack(ty, record, namespace, &mut Vec::new())
}

/// `stack` holds the alias names being expanded; meeting one again means the
/// aliases form a cycle that never reaches a concrete type.
fn resolve_with_stack(
    ty: &Type,
    record: &RecordType,
    namespace: Option<&Namespace>,
    stack: &mut Vec<String>,
) -> Result<Type, UnresolvedReference> {
    match ty {
        Type::Ref(name) => {
            let unresolved = || UnresolvedReference { name: name.clone() };
            if stack.contains(name) {
                return Err(unresolved());
            }
            let found = lookup(name, record, namespace).ok_or_else(unresolved)?;
            stack.push(name.clone());
            let resolved = resolve_with_stack(&found, record, namespace, stack);
            stack.pop();
            resolved
        }
        other => other.try_map_children(&mut |child| {
            resolve_with_stack(child, record, namespace, stack)
        }),
    }
}

fn lookup(name: &str, record: &RecordType, namespace: Option<&Namespace>) -> Option<Type> {
    if let Some(ty) = namespace.and_then(|ns| ns.get(name)) {
        return Some(ty.clone());
    }
    for ancestor in record.ancestors() {
        if let Some(ty) = ancestor.namespace().and_then(|ns| ns.get(name)) {
            return Some(ty.clone());
        }
    }
    record
        .ancestors()
        .find(|ancestor| ancestor.name() == name)
        .map(Type::record)
}
