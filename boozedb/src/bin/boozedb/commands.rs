use std::path::PathBuf;

use anyhow::{Context, Result};
use boozedb::{
    Bottle, BoozeDbConfig, CatalogResult, CatalogService, CatalogStore, CategoryTaxonomy, DefaultAssembler, FilterKey,
    FilterMap, MemoryCatalogStore, RedisCatalogStore, RequestContext, SearchCriteria,
};
use clap::Args;
use url::Url;

use crate::output::OutputManager;

/// Store selected on the command line.
pub enum Backend {
    Memory(MemoryCatalogStore),
    Redis(RedisCatalogStore),
}

impl Backend {
    pub async fn open(config: &BoozeDbConfig, fixtures: Option<&PathBuf>, output: &OutputManager) -> Result<Self> {
        match fixtures {
            Some(path) => {
                output.verbose(&format!("Using fixtures from {}", path.display()));
                let store = MemoryCatalogStore::from_json_file(path)
                    .with_context(|| format!("Failed to load fixtures from {}", path.display()))?;
                Ok(Self::Memory(store))
            }
            None => {
                let url = config.redis_url()?;
                output.verbose(&format!("Connecting to Redis (prefix '{}')", config.redis.prefix));
                let store = RedisCatalogStore::connect(&url, config.redis.prefix.clone())
                    .await
                    .context("Failed to connect to Redis")?;
                Ok(Self::Redis(store))
            }
        }
    }
}

impl CatalogStore for Backend {
    async fn get_by_id(&self, id: &str) -> CatalogResult<Option<Bottle>> {
        match self {
            Backend::Memory(store) => store.get_by_id(id).await,
            Backend::Redis(store) => store.get_by_id(id).await,
        }
    }

    async fn search(&self, filters: &FilterMap) -> CatalogResult<Vec<Bottle>> {
        match self {
            Backend::Memory(store) => store.search(filters).await,
            Backend::Redis(store) => store.search(filters).await,
        }
    }

    async fn get_categories_map(&self) -> CatalogResult<CategoryTaxonomy> {
        match self {
            Backend::Memory(store) => store.get_categories_map().await,
            Backend::Redis(store) => store.get_categories_map().await,
        }
    }
}

pub type Service = CatalogService<Backend, DefaultAssembler>;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Bottle identifier
    pub id: String,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Exact category, e.g. "Whiskey"
    #[arg(long)]
    pub category: Option<String>,
    /// Exact sub-category, e.g. "Bourbon"
    #[arg(long)]
    pub sub_category: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub min_price: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub max_price: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub min_proof: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub max_proof: Option<f64>,
    /// Minimum volume in millilitres
    #[arg(long, allow_negative_numbers = true)]
    pub min_size: Option<f64>,
    /// Maximum volume in millilitres
    #[arg(long, allow_negative_numbers = true)]
    pub max_size: Option<f64>,
    /// Minimum age statement in years
    #[arg(long, allow_negative_numbers = true)]
    pub min_age: Option<i64>,
    /// Maximum age statement in years
    #[arg(long, allow_negative_numbers = true)]
    pub max_age: Option<i64>,
    /// One-based page number; zero or negative means the first page
    #[arg(long, allow_negative_numbers = true)]
    pub page: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub page_size: Option<i64>,
}

impl SearchArgs {
    /// Query pairs as they would appear on a `/bottles` request.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: FilterKey, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key.param(), value));
            }
        };
        push(FilterKey::Category, self.category.clone());
        push(FilterKey::SubCategory, self.sub_category.clone());
        push(FilterKey::MinPrice, self.min_price.map(|v| v.to_string()));
        push(FilterKey::MaxPrice, self.max_price.map(|v| v.to_string()));
        push(FilterKey::MinProof, self.min_proof.map(|v| v.to_string()));
        push(FilterKey::MaxProof, self.max_proof.map(|v| v.to_string()));
        push(FilterKey::MinSize, self.min_size.map(|v| v.to_string()));
        push(FilterKey::MaxSize, self.max_size.map(|v| v.to_string()));
        push(FilterKey::MinAge, self.min_age.map(|v| v.to_string()));
        push(FilterKey::MaxAge, self.max_age.map(|v| v.to_string()));
        push(FilterKey::PageOffset, self.page.map(|v| v.to_string()));
        push(FilterKey::PageSize, self.page_size.map(|v| v.to_string()));
        pairs
    }
}

fn request_url(base_url: &str, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
    let mut url = Url::parse(base_url).with_context(|| format!("Invalid links base url {base_url}"))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Links base url {base_url} cannot carry a path"))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}

pub async fn handle_get(service: &Service, config: &BoozeDbConfig, args: GetArgs, output: &OutputManager) -> Result<()> {
    let ctx = RequestContext::new(request_url(&config.links.base_url, &["bottles", args.id.as_str()], &[])?);
    match service.get_bottle_by_id(&args.id, &ctx).await? {
        Some(response) => output.display(&response),
        None => {
            output.warning(&format!("No bottle with id '{}'", args.id));
            Ok(())
        }
    }
}

pub async fn handle_search(
    service: &Service,
    config: &BoozeDbConfig,
    args: SearchArgs,
    output: &OutputManager,
) -> Result<()> {
    let ctx = RequestContext::new(request_url(&config.links.base_url, &["bottles"], &args.query_pairs())?);
    let criteria = SearchCriteria::from_query_pairs(ctx.query_pairs())?;
    output.verbose(&format!("Searching {}", ctx.request_url));

    let response = service.search(&ctx, &criteria).await?;
    output.display(&response)?;
    output.info(&format!("{} bottle(s) on this page", response.links.result_size));
    Ok(())
}

pub async fn handle_meta(service: &Service, output: &OutputManager) -> Result<()> {
    let meta = service.metadata().await?;
    output.display(&meta)?;
    output.success(&format!("{} categories", meta.categories.len()));
    Ok(())
}
