//! Bounded memoization of reflection results.
//!
//! Field lists and resolved field types are pure functions of the record type
//! (and, for resolution, the caller's namespace), so they are computed once and
//! shared. Entries are evicted least-recently-used once the cache is full.

use core::num::NonZeroUsize;
use std::sync::{Arc, LazyLock};

use lru::LruCache;
use parking_lot::Mutex;
use shapecast_core::{FieldDef, Namespace, RecordType};

use crate::reflect::{Hints, Reflector, UnresolvedReference};
use crate::tracing_macros::trace;

/// Maximum number of entries a new cache holds.
pub const DEFAULT_CACHE_SIZE: Option<usize> = Some(2048);

static GLOBAL: LazyLock<Arc<ReflectCache>> = LazyLock::new(|| Arc::new(ReflectCache::default()));

/// Which computation an entry memoizes, and for which inputs.
#[derive(Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Fields(RecordType),
    Hints(RecordType, Option<Namespace>),
}

#[derive(Clone)]
enum CacheEntry {
    Fields(Arc<[FieldDef]>),
    Hints(Arc<Hints>),
}

struct CacheState {
    max_size: Option<usize>,
    entries: LruCache<CacheKey, CacheEntry>,
}

impl CacheState {
    /// Starts unbounded and applies the bound by resizing: `LruCache::new`
    /// reserves room for `cap` entries up front.
    fn new(max_size: Option<usize>) -> Self {
        let mut state = Self {
            max_size: None,
            entries: LruCache::unbounded(),
        };
        state.resize(max_size);
        state
    }

    fn get(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    /// Store `entry` unless another caller got there first, returning the
    /// entry that is now authoritative.
    fn insert(&mut self, key: CacheKey, entry: CacheEntry) -> CacheEntry {
        if self.max_size == Some(0) {
            return entry;
        }
        if let Some(existing) = self.entries.get(&key) {
            return existing.clone();
        }
        self.entries.put(key, entry.clone());
        entry
    }

    fn resize(&mut self, max_size: Option<usize>) {
        self.max_size = max_size;
        match max_size.and_then(NonZeroUsize::new) {
            Some(cap) => self.entries.resize(cap),
            None => {
                if max_size == Some(0) {
                    self.entries.clear();
                }
                self.entries.resize(NonZeroUsize::MAX);
            }
        }
    }
}

/// A thread-safe, bounded cache of reflection results.
///
/// Values are computed outside the lock. When two callers race to fill the
/// same entry, the first one stored wins and both get that result.
pub struct ReflectCache {
    state: Mutex<CacheState>,
}

impl Default for ReflectCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl ReflectCache {
    /// A cache holding at most `max_size` entries (`None`: unbounded,
    /// `Some(0)`: nothing is kept).
    pub fn new(max_size: Option<usize>) -> Self {
        Self {
            state: Mutex::new(CacheState::new(max_size)),
        }
    }

    /// The process-wide cache used by [`Engine::default`](crate::Engine).
    pub fn global() -> &'static Arc<ReflectCache> {
        &GLOBAL
    }

    /// The configured capacity.
    pub fn max_size(&self) -> Option<usize> {
        self.state.lock().max_size
    }

    /// Change the capacity, evicting entries that no longer fit.
    pub fn set_max_size(&self, max_size: Option<usize>) {
        self.state.lock().resize(max_size);
    }

    /// Drop every entry. Results already handed out stay valid.
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fields of `record`, asking `reflector` on a miss.
    pub fn fields(&self, reflector: &dyn Reflector, record: &RecordType) -> Arc<[FieldDef]> {
        let key = CacheKey::Fields(record.clone());
        if let Some(CacheEntry::Fields(fields)) = self.state.lock().get(&key) {
            trace!(record = record.name(), "field cache hit");
            return fields;
        }
        trace!(record = record.name(), "field cache miss");
        let fields: Arc<[FieldDef]> = reflector.fields(record).into();
        match self.state.lock().insert(key, CacheEntry::Fields(fields.clone())) {
            CacheEntry::Fields(stored) => stored,
            CacheEntry::Hints(_) => fields,
        }
    }

    /// The resolved field types of `record`, asking `reflector` on a miss.
    /// Failures are not cached.
    pub fn hints(
        &self,
        reflector: &dyn Reflector,
        record: &RecordType,
        namespace: Option<&Namespace>,
    ) -> Result<Arc<Hints>, UnresolvedReference> {
        let key = CacheKey::Hints(record.clone(), namespace.cloned());
        if let Some(CacheEntry::Hints(hints)) = self.state.lock().get(&key) {
            trace!(record = record.name(), "hint cache hit");
            return Ok(hints);
        }
        trace!(record = record.name(), "hint cache miss");
        let hints = Arc::new(reflector.resolve_hints(record, namespace)?);
        Ok(match self.state.lock().insert(key, CacheEntry::Hints(hints.clone())) {
            CacheEntry::Hints(stored) => stored,
            CacheEntry::Fields(_) => hints,
        })
    }
}

impl core::fmt::Debug for ReflectCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ReflectCache")
            .field("max_size", &state.max_size)
            .field("len", &state.entries.len())
            .finish()
    }
}
