//! Category taxonomy cache.

use std::sync::{Arc, RwLock};

use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::{errors::CatalogResult, store::CatalogStore, types::CategoryTaxonomy};

/// Metadata view returned to callers.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoozeDbMeta {
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub categories: Arc<CategoryTaxonomy>,
}

impl BoozeDbMeta {
    pub fn new(categories: Arc<CategoryTaxonomy>) -> Self {
        Self { categories }
    }
}

/// Single-load-then-reuse holder for the category taxonomy.
///
/// The first access while the cached taxonomy is empty loads it from the
/// store; later accesses hand out the same `Arc` without touching the store.
/// An empty load leaves the cache empty so the next access retries.
///
/// The lock is never held across the store call; concurrent first accesses
/// may each load and the last write wins.
#[derive(Debug, Default)]
pub struct CategoryCache {
    taxonomy: RwLock<Arc<CategoryTaxonomy>>,
}

impl CategoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-populated with a snapshot taken elsewhere (e.g. at startup).
    pub fn with_snapshot(taxonomy: CategoryTaxonomy) -> Self {
        Self {
            taxonomy: RwLock::new(Arc::new(taxonomy)),
        }
    }

    /// Current cached value, possibly empty.
    pub fn snapshot(&self) -> Arc<CategoryTaxonomy> {
        match self.taxonomy.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Return the cached taxonomy, loading it from `store` when empty.
    pub async fn get_or_load<S: CatalogStore>(&self, store: &S) -> CatalogResult<Arc<CategoryTaxonomy>> {
        let cached = self.snapshot();
        if !cached.is_empty() {
            debug!("category cache hit ({} categories)", cached.len());
            return Ok(cached);
        }

        debug!("category cache empty, loading from store");
        let loaded = Arc::new(store.get_categories_map().await?);
        if !loaded.is_empty() {
            self.store(Arc::clone(&loaded));
        }
        Ok(loaded)
    }

    fn store(&self, taxonomy: Arc<CategoryTaxonomy>) {
        match self.taxonomy.write() {
            Ok(mut guard) => *guard = taxonomy,
            Err(poisoned) => *poisoned.into_inner() = taxonomy,
        }
    }
}
