//! BoozeDB catalog lookup library.
//!
//! Translates optional search criteria into a normalized filter map with a
//! pagination window, runs lookups against a [`CatalogStore`], and serves the
//! category taxonomy through a load-once cache.

pub mod config;
pub mod errors;
pub mod filters;
pub mod links;
pub mod metadata;
pub mod response;
pub mod service;
pub mod store;
pub mod types;

pub use config::BoozeDbConfig;
pub use errors::*;
pub use filters::{FilterKey, FilterMap, SearchCriteria, build_filter_map};
pub use links::{BottleLinks, BottleListLinks, DefaultAssembler, RequestContext, ResponseAssembler};
pub use metadata::{BoozeDbMeta, CategoryCache};
pub use response::{BottleListResponse, BottleResponse};
pub use service::CatalogService;
pub use store::{CatalogStore, MemoryCatalogStore, RedisCatalogStore};
pub use types::{Bottle, CategoryTaxonomy, DEFAULT_PAGE_OFFSET, DEFAULT_PAGE_SIZE, PaginationDefaults};

// Re-export redis so callers can build their own connection managers
pub use redis;
pub use redis::aio::ConnectionManager;
