// Copyright (C) 2025 Kashin Vladislav (Rust adaptation author)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use parking_lot::Mutex;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
#[error("An error occurred while trying to create regex: {0}")]
pub struct InvalidRegexError(#[from] regex::Error);

pub const DEFAULT_CACHE_CAPACITY: usize = 100;

struct CachedRegex {
    regex: Arc<Regex>,
    last_used: AtomicU64,
}

/// Bounded cache of compiled metadata patterns.
///
/// Lookups and insertions go through the sharded map, so concurrent readers
/// never contend on a single lock. Every hit stamps the entry with a tick of
/// a global clock; once the cache grows past its capacity the entries with
/// the oldest stamps are evicted under `eviction_lock`. Eviction only costs a
/// recompilation later.
pub struct RegexCache {
    cache: DashMap<String, CachedRegex>,
    capacity: usize,
    clock: AtomicU64,
    eviction_lock: Mutex<()>,
}

/// The three ways a metadata pattern is applied to a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    None,
    Start,
    Full,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: DashMap::with_capacity(capacity + 1),
            capacity: capacity.max(1),
            clock: AtomicU64::new(0),
            eviction_lock: Mutex::new(()),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the pattern compiled as is, for searching anywhere in a string.
    pub fn get_regex(&self, pattern: &str) -> Result<Arc<Regex>, InvalidRegexError> {
        self.get_anchored(pattern, Anchor::None)
    }

    /// Returns the pattern compiled so that it only matches at the beginning
    /// of a string. Capture group numbering is preserved.
    pub fn get_regex_at_start(&self, pattern: &str) -> Result<Arc<Regex>, InvalidRegexError> {
        self.get_anchored(pattern, Anchor::Start)
    }

    /// Returns the pattern compiled so that it only matches a whole string.
    pub fn get_regex_full(&self, pattern: &str) -> Result<Arc<Regex>, InvalidRegexError> {
        self.get_anchored(pattern, Anchor::Full)
    }

    /// `true` if the pattern matches the whole of `s`.
    pub fn full_match(&self, pattern: &str, s: &str) -> Result<bool, InvalidRegexError> {
        Ok(self.get_regex_full(pattern)?.is_match(s))
    }

    /// `true` if the pattern matches a prefix of `s`.
    pub fn matches_start(&self, pattern: &str, s: &str) -> Result<bool, InvalidRegexError> {
        Ok(self.get_regex_at_start(pattern)?.is_match(s))
    }

    fn get_anchored(&self, pattern: &str, anchor: Anchor) -> Result<Arc<Regex>, InvalidRegexError> {
        let key = match anchor {
            Anchor::None => pattern.to_owned(),
            Anchor::Start => fast_cat::concat_str!("^(?:", pattern, ")"),
            Anchor::Full => fast_cat::concat_str!("^(?:", pattern, ")$"),
        };
        let tick = self.clock.fetch_add(1, Ordering::Relaxed);
        if let Some(entry) = self.cache.get(&key) {
            entry.last_used.store(tick, Ordering::Relaxed);
            return Ok(entry.regex.clone());
        }
        let regex = Arc::new(Regex::new(&key)?);
        self.cache.insert(
            key,
            CachedRegex {
                regex: regex.clone(),
                last_used: AtomicU64::new(tick),
            },
        );
        if self.cache.len() > self.capacity {
            self.evict_least_recently_used();
        }
        Ok(regex)
    }

    fn evict_least_recently_used(&self) {
        let _guard = self.eviction_lock.lock();
        while self.cache.len() > self.capacity {
            let oldest = self
                .cache
                .iter()
                .min_by_key(|entry| entry.value().last_used.load(Ordering::Relaxed))
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    log::trace!("Evicting regex '{}' from cache", key);
                    self.cache.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::RegexCache;

    #[test]
    fn anchoring_modes() {
        let cache = RegexCache::new();
        // Leftmost-first alternation must not prevent a full match.
        assert!(cache.full_match(r"\d{3}|\d{5}", "12345").unwrap());
        assert!(!cache.full_match(r"\d{3}", "12345").unwrap());
        assert!(cache.matches_start(r"\d{3}", "12345").unwrap());
        assert!(!cache.matches_start(r"4", "12345").unwrap());
    }

    #[test]
    fn returns_same_compiled_instance() {
        let cache = RegexCache::new();
        let first = cache.get_regex("[2-9]").unwrap();
        let second = cache.get_regex("[2-9]").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let cache = RegexCache::new();
        assert!(cache.get_regex("(unclosed").is_err());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = RegexCache::with_capacity(2);
        let hot = cache.get_regex("a").unwrap();
        cache.get_regex("b").unwrap();
        // Touch "a" so that "b" becomes the coldest entry.
        cache.get_regex("a").unwrap();
        cache.get_regex("c").unwrap();
        assert_eq!(cache.len(), 2);
        assert!(Arc::ptr_eq(&hot, &cache.get_regex("a").unwrap()));
        // "b" was evicted, so it is compiled again.
        assert!(cache.get_regex("b").unwrap().is_match("b"));
        assert!(cache.len() <= 2);
    }

    #[test]
    fn concurrent_lookups_stay_bounded() {
        let cache = Arc::new(RegexCache::with_capacity(8));
        let handles = (0..4)
            .map(|worker| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        let pattern = format!("{}{}", worker, i % 12);
                        assert!(cache.full_match(&pattern, &pattern).unwrap());
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 8);
    }
}
