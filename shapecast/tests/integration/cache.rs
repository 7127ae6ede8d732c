use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use shapecast::{
    Config, DEFAULT_CACHE_SIZE, DefaultReflector, Engine, FieldDef, Hints, Namespace, RecordType,
    ReflectCache, Reflector, UnresolvedReference, cache_size, clear_cache, from_value,
    set_cache_size, value,
};

use crate::{line, point};

/// Counts field introspections, delegating the actual work.
#[derive(Default)]
struct CountingReflector {
    fields: Arc<AtomicUsize>,
    hints: Arc<AtomicUsize>,
}

impl Reflector for CountingReflector {
    fn fields(&self, record: &RecordType) -> Vec<FieldDef> {
        self.fields.fetch_add(1, Ordering::SeqCst);
        DefaultReflector.fields(record)
    }

    fn resolve_hints(
        &self,
        record: &RecordType,
        namespace: Option<&Namespace>,
    ) -> Result<Hints, UnresolvedReference> {
        self.hints.fetch_add(1, Ordering::SeqCst);
        DefaultReflector.resolve_hints(record, namespace)
    }
}

#[shapecast_testhelpers::test]
fn introspection_runs_once_per_record_until_cleared() {
    let reflector = CountingReflector::default();
    let fields = Arc::clone(&reflector.fields);
    let hints = Arc::clone(&reflector.hints);
    let engine = Engine::default().with_reflector(reflector);
    let point = point();
    let data = value!({"x": 1, "y": 2});
    let config = Config::default();

    engine.from_value(&point, &data, &config).unwrap();
    engine.from_value(&point, &data, &config).unwrap();
    assert_eq!(fields.load(Ordering::SeqCst), 1);
    assert_eq!(hints.load(Ordering::SeqCst), 1);

    engine.cache().clear();
    engine.from_value(&point, &data, &config).unwrap();
    engine.from_value(&point, &data, &config).unwrap();
    assert_eq!(fields.load(Ordering::SeqCst), 2);
    assert_eq!(hints.load(Ordering::SeqCst), 2);
}

#[shapecast_testhelpers::test]
fn nested_records_are_cached_individually() {
    let reflector = CountingReflector::default();
    let fields = Arc::clone(&reflector.fields);
    let engine = Engine::default().with_reflector(reflector);
    let point = point();
    let line = line(&point);
    let data = value!({"start": {"x": 0, "y": 0}, "end": {"x": 1, "y": 1}});

    engine.from_value(&line, &data, &Config::default()).unwrap();
    // one lookup for the line, one for the point shared by both endpoints
    assert_eq!(fields.load(Ordering::SeqCst), 2);
    assert_eq!(engine.cache().len(), 4);
}

#[shapecast_testhelpers::test]
fn disabled_cache_recomputes_every_time() {
    let reflector = CountingReflector::default();
    let fields = Arc::clone(&reflector.fields);
    let engine = Engine::default()
        .with_reflector(reflector)
        .with_cache(Arc::new(ReflectCache::new(Some(0))));
    let point = point();
    let data = value!({"x": 1, "y": 2});

    for _ in 0..3 {
        engine.from_value(&point, &data, &Config::default()).unwrap();
    }
    assert_eq!(fields.load(Ordering::SeqCst), 3);
    assert!(engine.cache().is_empty());
}

#[shapecast_testhelpers::test]
fn engines_can_share_a_cache() {
    let cache = Arc::new(ReflectCache::new(None));
    let a = Engine::default().with_cache(Arc::clone(&cache));
    let b = Engine::default().with_cache(Arc::clone(&cache));
    let point = point();
    let data = value!({"x": 1, "y": 2});

    a.from_value(&point, &data, &Config::default()).unwrap();
    assert_eq!(cache.len(), 2);
    b.from_value(&point, &data, &Config::default()).unwrap();
    assert_eq!(cache.len(), 2);
}

#[shapecast_testhelpers::test]
fn global_cache_controls() {
    assert_eq!(ReflectCache::new(DEFAULT_CACHE_SIZE).max_size(), Some(2048));

    let previous = cache_size();
    set_cache_size(Some(16));
    assert_eq!(cache_size(), Some(16));

    from_value(&point(), &value!({"x": 1, "y": 2})).unwrap();
    clear_cache();

    set_cache_size(previous);
    assert_eq!(cache_size(), previous);
}
