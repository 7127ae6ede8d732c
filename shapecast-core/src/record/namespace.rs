use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Type;

/// Named types available for resolving forward references.
///
/// Cheap to clone; hashable so it can be part of a cache key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Namespace(Arc<BTreeMap<String, Type>>);

impl Namespace {
    /// An empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ty` under `name`, returning the updated namespace.
    pub fn with(mut self, name: impl Into<String>, ty: impl Into<Type>) -> Self {
        self.insert(name, ty);
        self
    }

    /// Register `ty` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, ty: impl Into<Type>) {
        Arc::make_mut(&mut self.0).insert(name.into(), ty.into());
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.0.get(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Type)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (K, Type)>>(iter: I) -> Self {
        Namespace(Arc::new(
            iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }
}
