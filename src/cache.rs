//! Bounded concurrent memoization of scan results.
//!
//! Entries are keyed by a 64-bit FNV-1a hash of the query text. The original
//! key bytes are stored alongside the hash and compared on lookup, so a hash
//! collision degrades to a miss instead of serving another text's results.
//!
//! Reads share a lock and never serialize against each other; insertion,
//! eviction and clearing take the exclusive lock. Hit/miss/eviction counters
//! are plain atomics updated outside the lock, so stats reads never block.
//!
//! Eviction removes the entry with the oldest insertion timestamp. A lookup
//! does not refresh that timestamp; this is deliberately not an LRU on
//! access.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::scanner::Match;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the text bytes.
#[inline]
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

struct CacheEntry {
    /// The exact query text, compared on lookup to rule out collisions.
    text: Box<[u8]>,
    matches: Vec<Match>,
    duration: Duration,
    created: Instant,
    hits: AtomicU64,
}

/// Snapshot of cache counters. Monotonic between [`ResultCache::clear`]s;
/// concurrent readers may observe slightly stale values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_entries: usize,
}

/// A bounded concurrent map from query text to its previous scan result.
pub struct ResultCache {
    entries: RwLock<FxHashMap<u64, CacheEntry>>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl ResultCache {
    /// Create a cache holding at most `max_entries` results.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Look up the cached result for `text`.
    ///
    /// A hit increments the entry's hit count and the global hit counter; a
    /// miss increments the global miss counter.
    pub fn get(&self, text: &[u8]) -> Option<(Vec<Match>, Duration)> {
        let key = fnv1a(text);
        {
            let entries = self.entries.read();
            if let Some(entry) = entries.get(&key) {
                if entry.text.as_ref() == text {
                    entry.hits.fetch_add(1, Ordering::Relaxed);
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some((entry.matches.clone(), entry.duration));
                }
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a scan result. At capacity, the oldest entry by insertion
    /// timestamp is evicted first.
    pub fn put(&self, text: &[u8], matches: Vec<Match>, duration: Duration) {
        if self.max_entries == 0 {
            return;
        }

        let key = fnv1a(text);
        let entry = CacheEntry {
            text: text.to_vec().into_boxed_slice(),
            matches,
            duration,
            created: Instant::now(),
            hits: AtomicU64::new(0),
        };

        let mut entries = self.entries.write();
        if entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.created)
                .map(|(&key, _)| key);
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        entries.insert(key, entry);
    }

    /// Drop all entries and reset the counters.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    /// Counter snapshot.
    pub fn stats(&self) -> CacheStats {
        let total_entries = self.entries.read().len();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            total_entries,
        }
    }

    /// Fraction of lookups served from the cache; 0.0 before any lookup.
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::MATCH_CONFIDENCE;

    fn sample_match(offset: usize) -> Match {
        Match {
            offset,
            length: 2,
            pattern_id: 0,
            confidence: MATCH_CONFIDENCE,
        }
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = ResultCache::new(4);
        assert!(cache.get(b"foo").is_none());

        cache.put(b"foo", vec![sample_match(0)], Duration::from_micros(3));
        let (matches, duration) = cache.get(b"foo").unwrap();
        assert_eq!(matches, vec![sample_match(0)]);
        assert_eq!(duration, Duration::from_micros(3));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_per_entry_hit_count() {
        let cache = ResultCache::new(4);
        cache.put(b"foo", vec![], Duration::ZERO);
        cache.get(b"foo");
        cache.get(b"foo");

        let entries = cache.entries.read();
        let entry = entries.values().next().unwrap();
        assert_eq!(entry.hits.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_eviction_removes_oldest_insertion() {
        let cache = ResultCache::new(2);
        cache.put(b"a", vec![], Duration::ZERO);
        cache.put(b"b", vec![], Duration::ZERO);
        cache.put(b"c", vec![], Duration::ZERO);

        let stats = cache.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 2);

        // "a" was the oldest insertion; lookups for it now miss.
        assert!(cache.get(b"a").is_none());
        assert!(cache.get(b"b").is_some());
        assert!(cache.get(b"c").is_some());
    }

    #[test]
    fn test_lookup_does_not_refresh_eviction_order() {
        let cache = ResultCache::new(2);
        cache.put(b"a", vec![], Duration::ZERO);
        cache.put(b"b", vec![], Duration::ZERO);

        // Touching "a" does not save it; insertion order decides.
        cache.get(b"a");
        cache.put(b"c", vec![], Duration::ZERO);

        assert!(cache.get(b"a").is_none());
        assert!(cache.get(b"b").is_some());
    }

    #[test]
    fn test_clear_resets_counters() {
        let cache = ResultCache::new(2);
        cache.put(b"a", vec![], Duration::ZERO);
        cache.get(b"a");
        cache.get(b"missing");

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
        assert!(cache.get(b"a").is_none());
    }

    #[test]
    fn test_hit_ratio() {
        let cache = ResultCache::new(4);
        assert_eq!(cache.hit_ratio(), 0.0);

        cache.get(b"a"); // miss
        cache.put(b"a", vec![], Duration::ZERO);
        cache.get(b"a"); // hit
        cache.get(b"a"); // hit
        assert!((cache.hit_ratio() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = ResultCache::new(0);
        cache.put(b"a", vec![], Duration::ZERO);
        assert!(cache.get(b"a").is_none());
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_concurrent_reads_and_writes() {
        use std::sync::Arc;

        let cache = Arc::new(ResultCache::new(1024));
        let mut handles = Vec::new();
        for t in 0..4u8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..100u8 {
                    let text = [t, i];
                    cache.put(&text, vec![], Duration::ZERO);
                    assert!(cache.get(&text).is_some());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 400);
        assert_eq!(stats.hits, 400);
    }
}
