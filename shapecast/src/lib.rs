#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod tracing_macros;

mod build;
mod cache;
mod cast;
mod config;
mod engine;
mod error;
mod matcher;
mod materialize;
mod reflect;

pub use cache::{DEFAULT_CACHE_SIZE, ReflectCache};
pub use config::{Config, FrozenAssignment, TypeHook};
pub use engine::Engine;
pub use error::{DeserializeError, ErrorKind, FieldPath, FieldSuggestion};
pub use matcher::is_instance;
pub use reflect::{DefaultReflector, Hints, Reflector, UnresolvedReference, resolve_type};

pub use shapecast_core::*;

/// Build an instance of `record` from `data` with the default configuration.
///
/// # Errors
///
/// Fails if `data` is not a map, a required field is missing, or a field value
/// does not match its declared type. See [`ErrorKind`] for the full list.
pub fn from_value(record: &RecordType, data: &Value) -> Result<Instance, DeserializeError> {
    from_value_with(record, data, &Config::default())
}

/// Build an instance of `record` from `data` with an explicit configuration.
pub fn from_value_with(
    record: &RecordType,
    data: &Value,
    config: &Config,
) -> Result<Instance, DeserializeError> {
    Engine::default().from_value(record, data, config)
}

/// Resize the process-wide reflection cache. `None` removes the bound and
/// `Some(0)` disables caching.
pub fn set_cache_size(max_size: Option<usize>) {
    ReflectCache::global().set_max_size(max_size);
}

/// Capacity of the process-wide reflection cache.
pub fn cache_size() -> Option<usize> {
    ReflectCache::global().max_size()
}

/// Empty the process-wide reflection cache.
pub fn clear_cache() {
    ReflectCache::global().clear();
}
