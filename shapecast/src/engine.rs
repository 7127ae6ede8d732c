use std::sync::Arc;

use shapecast_core::{Instance, RecordType, Type, Value};

use crate::build::Builder;
use crate::cache::ReflectCache;
use crate::config::Config;
use crate::error::DeserializeError;
use crate::reflect::{DefaultReflector, Reflector};

/// A reflector paired with the cache that memoizes its answers.
///
/// The default engine reads record definitions directly and shares the
/// process-wide cache. Engines are cheap to clone.
#[derive(Clone)]
pub struct Engine {
    reflector: Arc<dyn Reflector>,
    cache: Arc<ReflectCache>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            reflector: Arc::new(DefaultReflector),
            cache: Arc::clone(ReflectCache::global()),
        }
    }
}

impl Engine {
    /// Same as [`Engine::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `reflector` for introspection.
    ///
    /// Cached answers belong to the reflector that produced them, so this also
    /// gives the engine a fresh private cache. Call [`Engine::with_cache`]
    /// afterwards to share one between engines using the same reflector.
    pub fn with_reflector(mut self, reflector: impl Reflector + 'static) -> Self {
        self.reflector = Arc::new(reflector);
        self.cache = Arc::new(ReflectCache::default());
        self
    }

    /// Memoize reflection results in `cache`.
    pub fn with_cache(mut self, cache: Arc<ReflectCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The engine's reflector.
    pub fn reflector(&self) -> &dyn Reflector {
        &*self.reflector
    }

    /// The engine's cache.
    pub fn cache(&self) -> &Arc<ReflectCache> {
        &self.cache
    }

    /// Build an instance of `record` from `data`.
    pub fn from_value(
        &self,
        record: &RecordType,
        data: &Value,
        config: &Config,
    ) -> Result<Instance, DeserializeError> {
        Builder::new(self, config).materialize(record, data)
    }

    /// Build a value of any declared type, as a record field of that type
    /// would be built. Nothing is type-checked at the top level.
    pub fn build_value(
        &self,
        ty: &Type,
        data: &Value,
        config: &Config,
    ) -> Result<Value, DeserializeError> {
        Builder::new(self, config).build(ty, data)
    }
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
