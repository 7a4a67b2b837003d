//! Catalog lookups: by identifier, by filter criteria, and category metadata.

use log::debug;

use crate::{
    errors::CatalogResult,
    filters::{SearchCriteria, build_filter_map},
    links::{RequestContext, ResponseAssembler},
    metadata::{BoozeDbMeta, CategoryCache},
    response::{BottleListResponse, BottleResponse},
    store::CatalogStore,
    types::PaginationDefaults,
};

/// Orchestrates a store, a response assembler and the category cache.
///
/// # Example
///
/// ```no_run
/// use boozedb::{CatalogService, DefaultAssembler, MemoryCatalogStore, RequestContext, SearchCriteria};
///
/// # async fn demo() -> Result<(), boozedb::CatalogError> {
/// let service = CatalogService::new(
///     MemoryCatalogStore::from_json_file("bottles.json")?,
///     DefaultAssembler::parse("http://localhost:8080")?,
/// );
/// let ctx = RequestContext::parse("http://localhost:8080/bottles?category=Rum")?;
/// let page = service.search(&ctx, &SearchCriteria::new().with_category("Rum")).await?;
/// println!("{} bottles", page.len());
/// # Ok(())
/// # }
/// ```
pub struct CatalogService<S, A> {
    store: S,
    assembler: A,
    categories: CategoryCache,
    defaults: PaginationDefaults,
}

impl<S, A> CatalogService<S, A>
where
    S: CatalogStore,
    A: ResponseAssembler,
{
    pub fn new(store: S, assembler: A) -> Self {
        Self {
            store,
            assembler,
            categories: CategoryCache::new(),
            defaults: PaginationDefaults::default(),
        }
    }

    #[inline]
    pub fn with_defaults(mut self, defaults: PaginationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the category cache, e.g. with one seeded at startup.
    #[inline]
    pub fn with_category_cache(mut self, categories: CategoryCache) -> Self {
        self.categories = categories;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn defaults(&self) -> PaginationDefaults {
        self.defaults
    }

    /// Look up one bottle. A missing bottle is `Ok(None)`.
    pub async fn get_bottle_by_id(&self, id: &str, ctx: &RequestContext) -> CatalogResult<Option<BottleResponse>> {
        match self.store.get_by_id(id).await? {
            Some(bottle) => {
                let links = self.assembler.bottle_links(Some(&bottle), ctx);
                Ok(Some(BottleResponse { bottle, links }))
            }
            None => {
                let links = self.assembler.bottle_links(None, ctx);
                debug!("bottle {id} not found ({})", links.self_href);
                Ok(None)
            }
        }
    }

    /// Run a filtered search and wrap the page with list links.
    pub async fn search(&self, ctx: &RequestContext, criteria: &SearchCriteria) -> CatalogResult<BottleListResponse> {
        let filters = build_filter_map(criteria, &self.defaults);
        let results = self.store.search(&filters).await?;
        let links = self.assembler.list_links(ctx, results.len());
        Ok(BottleListResponse { links, results })
    }

    /// Category taxonomy, loaded from the store on first use only.
    pub async fn metadata(&self) -> CatalogResult<BoozeDbMeta> {
        let categories = self.categories.get_or_load(&self.store).await?;
        Ok(BoozeDbMeta::new(categories))
    }
}
