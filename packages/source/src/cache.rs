//! Explicit keyed cache of loaded zone sets.
//!
//! Owned by a [`crate::session::Session`]; there is no process-wide
//! instance. Entries live until invalidated or, when a TTL is configured,
//! until they expire. Expired entries are dropped on the next insert.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{ZoneQuery, ZoneSet};

struct CacheEntry {
    set: Arc<ZoneSet>,
    stored_at: Instant,
}

/// Maps [`ZoneQuery`] to the [`ZoneSet`] it produced.
pub struct ZoneCache {
    entries: HashMap<ZoneQuery, CacheEntry>,
    ttl: Option<Duration>,
}

impl ZoneCache {
    /// Creates an empty cache. `ttl = None` keeps entries until
    /// invalidated.
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Returns the cached set for `query` if present and not expired.
    #[must_use]
    pub fn get(&self, query: &ZoneQuery) -> Option<Arc<ZoneSet>> {
        self.get_at(query, Instant::now())
    }

    fn get_at(&self, query: &ZoneQuery, now: Instant) -> Option<Arc<ZoneSet>> {
        let entry = self.entries.get(query)?;
        if self.is_expired(entry, now) {
            return None;
        }
        Some(Arc::clone(&entry.set))
    }

    /// Stores `set` under its own query and returns the shared handle.
    ///
    /// Expired entries are purged first.
    pub fn insert(&mut self, set: ZoneSet) -> Arc<ZoneSet> {
        self.insert_at(set, Instant::now())
    }

    fn insert_at(&mut self, set: ZoneSet, now: Instant) -> Arc<ZoneSet> {
        let purged = self.purge_expired_at(now);
        if purged > 0 {
            log::debug!("Purged {purged} expired zone set(s)");
        }

        let set = Arc::new(set);
        self.entries.insert(
            set.query.clone(),
            CacheEntry {
                set: Arc::clone(&set),
                stored_at: now,
            },
        );
        set
    }

    /// Removes the entry for `query`. Returns whether one existed.
    pub fn invalidate(&mut self, query: &ZoneQuery) -> bool {
        self.entries.remove(query).is_some()
    }

    fn purge_expired_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| ttl.is_none_or(|ttl| now.duration_since(entry.stored_at) < ttl));
        before - self.entries.len()
    }

    /// Number of stored entries, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.duration_since(entry.stored_at) >= ttl)
    }
}

impl Default for ZoneCache {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use freezing_zones_zone_models::Year;

    use super::*;

    fn set(year: u16, province: &str) -> ZoneSet {
        ZoneSet {
            query: ZoneQuery {
                province: province.to_string(),
                ..ZoneQuery::for_year(Year::new(year).unwrap())
            },
            zones: Vec::new(),
            total_count: Some(0),
            truncated: false,
            dropped: 0,
        }
    }

    #[test]
    fn returns_stored_set() {
        let mut cache = ZoneCache::default();
        let stored = cache.insert(set(2023, ""));
        let hit = cache.get(&stored.query).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
    }

    #[test]
    fn keys_include_region_filters() {
        let mut cache = ZoneCache::default();
        cache.insert(set(2023, ""));
        let filtered = set(2023, "42").query;
        assert!(cache.get(&filtered).is_none());
    }

    #[test]
    fn invalidate_removes_one_entry() {
        let mut cache = ZoneCache::default();
        let a = cache.insert(set(2023, "")).query.clone();
        cache.insert(set(2022, ""));

        assert!(cache.invalidate(&a));
        assert!(!cache.invalidate(&a));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expires_after_ttl() {
        let ttl = Duration::from_secs(60);
        let mut cache = ZoneCache::new(Some(ttl));
        let query = cache.insert(set(2021, "")).query.clone();
        let later = Instant::now() + ttl + Duration::from_secs(1);

        assert!(cache.get(&query).is_some());
        assert!(cache.get_at(&query, later).is_none());
        assert_eq!(cache.purge_expired_at(later), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_drops_expired_entries() {
        let ttl = Duration::from_secs(60);
        let mut cache = ZoneCache::new(Some(ttl));
        let start = Instant::now();
        let stale = cache.insert_at(set(2020, ""), start).query.clone();
        cache.insert_at(set(2021, ""), start + Duration::from_secs(30));

        let later = start + ttl + Duration::from_secs(1);
        let fresh = cache.insert_at(set(2022, ""), later).query.clone();

        assert_eq!(cache.len(), 2);
        assert!(cache.get_at(&stale, later).is_none());
        assert!(cache.get_at(&fresh, later).is_some());
    }

    #[test]
    fn no_ttl_never_expires() {
        let mut cache = ZoneCache::new(None);
        let query = cache.insert(set(2019, "")).query.clone();
        let much_later = Instant::now() + Duration::from_secs(86_400 * 365);
        assert!(cache.get_at(&query, much_later).is_some());
        assert_eq!(cache.purge_expired_at(much_later), 0);
    }
}
