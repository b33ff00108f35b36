//! Parsed Pattern Cache
//!
//! Descriptors for related types tend to repeat the same pattern strings, so
//! parsed patterns are kept in a small process-wide LRU.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, OnceLock};

use super::parser::{parse, PatternExpr};

/// Number of distinct pattern strings kept
const CACHE_CAPACITY: usize = 256;

static CACHE: OnceLock<Mutex<LruCache<String, Arc<PatternExpr>>>> = OnceLock::new();

fn cache() -> &'static Mutex<LruCache<String, Arc<PatternExpr>>> {
    CACHE.get_or_init(|| {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Mutex::new(LruCache::new(capacity))
    })
}

/// Parse `pattern`, reusing an earlier parse of the same string
pub fn parse_cached(pattern: &str) -> Result<Arc<PatternExpr>, String> {
    // A poisoned lock only means another thread panicked mid-insert; the
    // cache content is still a valid LRU.
    {
        let mut guard = cache().lock().unwrap_or_else(|e| e.into_inner());
        if let Some(hit) = guard.get(pattern) {
            return Ok(Arc::clone(hit));
        }
    }

    let parsed = Arc::new(parse(pattern)?);
    cache()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .put(pattern.to_string(), Arc::clone(&parsed));
    Ok(parsed)
}
