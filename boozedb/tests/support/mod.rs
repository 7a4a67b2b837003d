#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use boozedb::{
    Bottle, CatalogResult, CatalogStore, CategoryTaxonomy, DefaultAssembler, FilterMap, MemoryCatalogStore,
    RequestContext,
};

pub const BASE_URL: &str = "http://localhost:8080";

pub fn fixtures_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/bottles.json")
}

pub fn fixture_store() -> MemoryCatalogStore {
    MemoryCatalogStore::from_json_file(fixtures_path()).expect("fixtures should load")
}

pub fn assembler() -> DefaultAssembler {
    DefaultAssembler::parse(BASE_URL).expect("base url should parse")
}

pub fn ctx(path_and_query: &str) -> RequestContext {
    RequestContext::parse(&format!("{BASE_URL}{path_and_query}")).expect("request url should parse")
}

/// Wraps a store and counts calls per operation.
#[derive(Default)]
pub struct CountingStore<S> {
    pub inner: S,
    pub get_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub category_loads: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            get_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            category_loads: AtomicUsize::new(0),
        }
    }

    pub fn category_loads(&self) -> usize {
        self.category_loads.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

impl<S: CatalogStore> CatalogStore for CountingStore<S> {
    async fn get_by_id(&self, id: &str) -> CatalogResult<Option<Bottle>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(id).await
    }

    async fn search(&self, filters: &FilterMap) -> CatalogResult<Vec<Bottle>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search(filters).await
    }

    async fn get_categories_map(&self) -> CatalogResult<CategoryTaxonomy> {
        self.category_loads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_categories_map().await
    }
}
