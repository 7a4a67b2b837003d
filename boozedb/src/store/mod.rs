//! Catalog store contract and its backends.
//!
//! The service layer only ever talks to [`CatalogStore`]. Two backends ship
//! with the crate: [`MemoryCatalogStore`] for fixtures and tests, and
//! [`RedisCatalogStore`] which runs lookups against RedisJSON documents
//! indexed by RediSearch.

pub mod memory;
pub mod redisearch;

use crate::{
    errors::CatalogResult,
    filters::FilterMap,
    types::{Bottle, CategoryTaxonomy},
};

pub use self::memory::MemoryCatalogStore;
pub use self::redisearch::RedisCatalogStore;

#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    /// Fetch a single record. A missing record is `Ok(None)`, not an error.
    async fn get_by_id(&self, id: &str) -> CatalogResult<Option<Bottle>>;

    /// Run a filtered, paginated search and return the page in store order.
    async fn search(&self, filters: &FilterMap) -> CatalogResult<Vec<Bottle>>;

    /// Load the full category taxonomy.
    async fn get_categories_map(&self) -> CatalogResult<CategoryTaxonomy>;
}

impl<S: CatalogStore> CatalogStore for &S {
    async fn get_by_id(&self, id: &str) -> CatalogResult<Option<Bottle>> {
        (**self).get_by_id(id).await
    }

    async fn search(&self, filters: &FilterMap) -> CatalogResult<Vec<Bottle>> {
        (**self).search(filters).await
    }

    async fn get_categories_map(&self) -> CatalogResult<CategoryTaxonomy> {
        (**self).get_categories_map().await
    }
}
