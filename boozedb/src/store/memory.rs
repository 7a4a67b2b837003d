//! In-process catalog store backed by a vector of bottles.

use std::path::Path;

use log::debug;

use crate::{
    errors::{CatalogError, CatalogResult},
    filters::{FilterKey, FilterMap, parse_numeric_bound},
    store::CatalogStore,
    types::{Bottle, CategoryTaxonomy},
};

/// Catalog store holding its records in insertion order.
///
/// Applies the same filter semantics as the RediSearch backend: tag filters
/// match case-insensitively, numeric bounds are inclusive, and a bottle
/// without an age statement never satisfies an age filter.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    bottles: Vec<Bottle>,
}

impl MemoryCatalogStore {
    pub fn new(bottles: Vec<Bottle>) -> Self {
        Self { bottles }
    }

    /// Load a JSON array of bottles from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| CatalogError::Other {
            message: format!("failed to read fixtures {}: {err}", path.display()).into(),
        })?;
        let bottles: Vec<Bottle> = serde_json::from_str(&content)?;
        debug!("loaded {} bottles from {}", bottles.len(), path.display());
        Ok(Self::new(bottles))
    }

    pub fn bottles(&self) -> &[Bottle] {
        &self.bottles
    }

    fn matching(&self, filters: &FilterMap) -> CatalogResult<Vec<&Bottle>> {
        let predicate = MemoryPredicate::from_filters(filters)?;
        Ok(self.bottles.iter().filter(|bottle| predicate.matches(bottle)).collect())
    }
}

impl CatalogStore for MemoryCatalogStore {
    async fn get_by_id(&self, id: &str) -> CatalogResult<Option<Bottle>> {
        Ok(self.bottles.iter().find(|bottle| bottle.id == id).cloned())
    }

    async fn search(&self, filters: &FilterMap) -> CatalogResult<Vec<Bottle>> {
        let offset = usize::try_from(filters.offset().max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(filters.limit().max(0)).unwrap_or(usize::MAX);

        let page = self
            .matching(filters)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect::<Vec<_>>();
        debug!("memory search returned {} bottles (offset {offset}, limit {limit})", page.len());
        Ok(page)
    }

    async fn get_categories_map(&self) -> CatalogResult<CategoryTaxonomy> {
        Ok(self
            .bottles
            .iter()
            .map(|bottle| (bottle.category.clone(), bottle.sub_category.clone()))
            .collect())
    }
}

#[derive(Debug, Default)]
struct Range {
    min: Option<f64>,
    max: Option<f64>,
}

impl Range {
    fn parse(filters: &FilterMap, min: FilterKey, max: FilterKey) -> CatalogResult<Self> {
        Ok(Self {
            min: parse_numeric_bound(min.param(), filters.get(min))?,
            max: parse_numeric_bound(max.param(), filters.get(max))?,
        })
    }

    fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

#[derive(Debug)]
struct MemoryPredicate<'a> {
    category: Option<&'a str>,
    sub_category: Option<&'a str>,
    price: Range,
    proof: Range,
    size: Range,
    age: Range,
}

impl<'a> MemoryPredicate<'a> {
    fn from_filters(filters: &'a FilterMap) -> CatalogResult<Self> {
        Ok(Self {
            category: filters.get(FilterKey::Category),
            sub_category: filters.get(FilterKey::SubCategory),
            price: Range::parse(filters, FilterKey::MinPrice, FilterKey::MaxPrice)?,
            proof: Range::parse(filters, FilterKey::MinProof, FilterKey::MaxProof)?,
            size: Range::parse(filters, FilterKey::MinSize, FilterKey::MaxSize)?,
            age: Range::parse(filters, FilterKey::MinAge, FilterKey::MaxAge)?,
        })
    }

    fn matches(&self, bottle: &Bottle) -> bool {
        let tag_matches = |wanted: Option<&str>, actual: &str| wanted.is_none_or(|w| w.eq_ignore_ascii_case(actual));

        tag_matches(self.category, &bottle.category)
            && tag_matches(self.sub_category, &bottle.sub_category)
            && self.price.contains(bottle.price)
            && self.proof.contains(bottle.proof)
            && self.size.contains(bottle.size)
            && (!self.age.is_set() || bottle.age.is_some_and(|age| self.age.contains(age as f64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{SearchCriteria, build_filter_map};
    use crate::types::PaginationDefaults;

    fn bottle(id: &str, category: &str, sub_category: &str, price: f64, age: Option<i64>) -> Bottle {
        Bottle {
            id: id.to_string(),
            name: format!("Bottle {id}"),
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            price,
            proof: 90.0,
            size: 750.0,
            age,
        }
    }

    fn store() -> MemoryCatalogStore {
        MemoryCatalogStore::new(vec![
            bottle("a", "Whiskey", "Bourbon", 30.0, Some(4)),
            bottle("b", "Whiskey", "Rye", 45.0, None),
            bottle("c", "Rum", "Agricole", 55.0, Some(10)),
        ])
    }

    fn search_map(criteria: SearchCriteria) -> FilterMap {
        build_filter_map(&criteria, &PaginationDefaults::default())
    }

    #[tokio::test]
    async fn tag_filters_ignore_ascii_case() {
        let found = store()
            .search(&search_map(SearchCriteria::new().with_category("whiskey")))
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn age_filters_skip_bottles_without_age() {
        let found = store()
            .search(&search_map(SearchCriteria::new().with_age_range(Some(0), None)))
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn non_positive_page_size_returns_nothing() {
        let found = store()
            .search(&search_map(SearchCriteria::new().with_page(1, 0)))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn taxonomy_groups_sub_categories() {
        let taxonomy = store().get_categories_map().await.unwrap();
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(
            taxonomy.sub_categories("Whiskey"),
            Some(&["Bourbon".to_string(), "Rye".to_string()][..])
        );
    }
}
