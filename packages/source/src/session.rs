//! A session: one source plus the cache of everything it has loaded.
//!
//! Each CLI run or server process owns exactly one [`Session`]. Repeated
//! loads of the same [`ZoneQuery`] are served from the cache without
//! touching the network.

use std::sync::Arc;
use std::time::Duration;

use crate::api::OpenApiSource;
use crate::cache::ZoneCache;
use crate::progress::ProgressCallback;
use crate::source_def::{SourceDefinition, cache_ttl_from_env};
use crate::{SourceError, ZoneQuery, ZoneSet, ZoneSource, loader};

/// Owns a [`ZoneSource`] and its [`ZoneCache`].
pub struct Session {
    source: Arc<dyn ZoneSource>,
    definition: SourceDefinition,
    cache: ZoneCache,
}

impl Session {
    /// Creates a session around an arbitrary source.
    #[must_use]
    pub fn new(
        source: Arc<dyn ZoneSource>,
        definition: SourceDefinition,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            source,
            definition,
            cache: ZoneCache::new(ttl),
        }
    }

    /// Creates a session backed by the live portal, configured from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source cannot be configured (see
    /// [`OpenApiSource::from_env`]).
    pub fn from_env() -> Result<Self, SourceError> {
        let source = OpenApiSource::from_env()?;
        let definition = source.definition().clone();
        Ok(Self::new(
            Arc::new(source),
            definition,
            cache_ttl_from_env(),
        ))
    }

    /// Returns the source definition (supported years, page size).
    #[must_use]
    pub const fn definition(&self) -> &SourceDefinition {
        &self.definition
    }

    /// Loads `query`, serving it from the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if a cache miss triggers a fetch that fails.
    /// Failures are not cached.
    pub async fn load(
        &mut self,
        query: &ZoneQuery,
        progress: &dyn ProgressCallback,
    ) -> Result<Arc<ZoneSet>, SourceError> {
        if let Some(set) = self.cache.get(query) {
            log::debug!("Cache hit for {query:?}");
            return Ok(set);
        }

        log::debug!("Cache miss for {query:?}");
        progress.set_message(format!("Fetching {} freezing zones...", query.year));

        match loader::load(self.source.as_ref(), query).await {
            Ok(set) => {
                progress.finish_and_clear();
                let set = self.cache.insert(set);
                log::debug!("{} zone set(s) cached", self.cache.len());
                Ok(set)
            }
            Err(e) => {
                progress.finish(format!("Failed to fetch {} data", query.year));
                Err(e)
            }
        }
    }

    /// Drops the cached result for `query` so the next load refetches.
    pub fn invalidate(&mut self, query: &ZoneQuery) -> bool {
        self.cache.invalidate(query)
    }
}
