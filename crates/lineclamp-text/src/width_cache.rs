#![forbid(unsafe_code)]

//! Cell widths of grapheme clusters and atom labels, memoized.
//!
//! A fit renders `O(n log m)` nearly identical candidates, so a cell
//! renderer measures the same clusters again and again. Printable ASCII is
//! answered without touching the cache; everything else is looked up by a
//! 64-bit FxHash of the text in an LRU map.
//!
//! # Example
//! ```
//! use lineclamp_text::WidthCache;
//!
//! let mut widths = WidthCache::new(64);
//! assert_eq!(widths.width("a"), 1);
//! assert_eq!(widths.width("中"), 2);
//! assert_eq!(widths.width("中"), 2);
//!
//! let stats = widths.stats();
//! assert_eq!((stats.hits, stats.misses, stats.ascii), (1, 1, 1));
//! ```

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxHasher;

use crate::width::display_width;

/// Entries kept by [`WidthCache::default`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Lookup counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Lookups answered by the printable-ASCII fast path.
    pub ascii: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Share of cached lookups that hit, in `0.0..=1.0`.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

/// Memoized cell widths. One per renderer; not shared across threads.
#[derive(Debug)]
pub struct WidthCache {
    entries: LruCache<u64, usize>,
    stats: CacheStats,
}

impl WidthCache {
    /// A cache of at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats {
                capacity: capacity.get(),
                ..CacheStats::default()
            },
        }
    }

    /// Width of `text` in cells.
    pub fn width(&mut self, text: &str) -> usize {
        if let [byte] = text.as_bytes()
            && (byte.is_ascii_graphic() || *byte == b' ')
        {
            self.stats.ascii += 1;
            return 1;
        }
        self.width_with(text, display_width)
    }

    /// Width of `text`, computed by `measure` on a miss.
    pub fn width_with<F>(&mut self, text: &str, measure: F) -> usize
    where
        F: FnOnce(&str) -> usize,
    {
        let key = key_of(text);
        if let Some(&width) = self.entries.get(&key) {
            self.stats.hits += 1;
            return width;
        }
        self.stats.misses += 1;
        let width = measure(text);
        self.entries.put(key, width);
        width
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains(&key_of(text))
    }

    /// Forget every entry. Counters survive.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            ..self.stats
        }
    }
}

impl Default for WidthCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

fn key_of(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    hasher.finish()
}
