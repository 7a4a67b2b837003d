//! # Search criteria to filter map translation
//!
//! A search arrives as a set of independently optional criteria. The filter
//! builder flattens them into a [`FilterMap`]: one string-valued entry per
//! supplied criterion plus the pagination window, ready for a
//! [`CatalogStore`](crate::store::CatalogStore) to execute.
//!
//! | Criterion              | Key                        | Value            |
//! |------------------------|----------------------------|------------------|
//! | `category`             | [`FilterKey::Category`]    | verbatim         |
//! | `min_price` = `19.5`   | [`FilterKey::MinPrice`]    | `"19.5"`         |
//! | `min_size` = `750.0`   | [`FilterKey::MinSize`]     | `"750.0"`        |
//! | `page` = 3, size 20    | [`FilterKey::PageOffset`]  | `"40"`           |
//! | (always)               | [`FilterKey::PageSize`]    | effective size   |
//!
//! No bounds are checked here. A negative price or an inverted range passes
//! through unchanged, and a non-positive page collapses to the first page.

pub mod normalizers;

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::errors::CatalogError;
use crate::types::PaginationDefaults;

pub use normalizers::*;

/// Closed set of keys a filter map may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterKey {
    Category,
    SubCategory,
    MinPrice,
    MaxPrice,
    MinProof,
    MaxProof,
    MinSize,
    MaxSize,
    MinAge,
    MaxAge,
    PageOffset,
    PageSize,
}

impl FilterKey {
    /// The ten criterion keys, excluding pagination.
    pub const SCALAR: [FilterKey; 10] = [
        FilterKey::Category,
        FilterKey::SubCategory,
        FilterKey::MinPrice,
        FilterKey::MaxPrice,
        FilterKey::MinProof,
        FilterKey::MaxProof,
        FilterKey::MinSize,
        FilterKey::MaxSize,
        FilterKey::MinAge,
        FilterKey::MaxAge,
    ];

    /// Storage column (or pagination parameter) this key constrains.
    pub const fn column(self) -> &'static str {
        match self {
            FilterKey::Category => "category",
            FilterKey::SubCategory => "sub_category",
            FilterKey::MinPrice | FilterKey::MaxPrice => "price",
            FilterKey::MinProof | FilterKey::MaxProof => "proof",
            FilterKey::MinSize | FilterKey::MaxSize => "size",
            FilterKey::MinAge | FilterKey::MaxAge => "age",
            FilterKey::PageOffset => "offset",
            FilterKey::PageSize => "limit",
        }
    }

    /// Query-string parameter name feeding this key.
    pub const fn param(self) -> &'static str {
        match self {
            FilterKey::Category => "category",
            FilterKey::SubCategory => "subCategory",
            FilterKey::MinPrice => "minPrice",
            FilterKey::MaxPrice => "maxPrice",
            FilterKey::MinProof => "minProof",
            FilterKey::MaxProof => "maxProof",
            FilterKey::MinSize => "minSize",
            FilterKey::MaxSize => "maxSize",
            FilterKey::MinAge => "minAge",
            FilterKey::MaxAge => "maxAge",
            FilterKey::PageOffset => "page",
            FilterKey::PageSize => "pageSize",
        }
    }

    #[inline]
    pub const fn is_pagination(self) -> bool {
        matches!(self, FilterKey::PageOffset | FilterKey::PageSize)
    }
}

/// Normalized filter-key to string-value mapping handed to a store.
///
/// Equality is order independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterMap(BTreeMap<FilterKey, String>);

impl FilterMap {
    #[inline]
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, key: FilterKey) -> bool {
        self.0.contains_key(&key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.0.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Entries other than the pagination window.
    pub fn scalar_entries(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.iter().filter(|(key, _)| !key.is_pagination())
    }

    /// Parsed `PageOffset`, zero when missing or unparsable.
    pub fn offset(&self) -> i64 {
        self.get(FilterKey::PageOffset)
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }

    /// Parsed `PageSize`, zero when missing or unparsable.
    pub fn limit(&self) -> i64 {
        self.get(FilterKey::PageSize)
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }

    fn insert(&mut self, key: FilterKey, value: String) {
        self.0.insert(key, value);
    }

    fn insert_opt<T>(&mut self, key: FilterKey, value: Option<T>, format: impl FnOnce(T) -> String) {
        if let Some(value) = value {
            self.insert(key, format(value));
        }
    }
}

/// Optional search constraints, one per filterable dimension.
///
/// # Building Criteria
///
/// ```
/// use boozedb::filters::SearchCriteria;
///
/// let criteria = SearchCriteria::new()
///     .with_category("Whiskey")
///     .with_price_range(Some(20.0), Some(60.0))
///     .with_page(2, 10);
/// ```
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCriteria {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_proof: Option<f64>,
    pub max_proof: Option<f64>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[inline]
    pub fn with_sub_category(mut self, sub_category: impl Into<String>) -> Self {
        self.sub_category = Some(sub_category.into());
        self
    }

    #[inline]
    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[inline]
    pub fn with_proof_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_proof = min;
        self.max_proof = max;
        self
    }

    #[inline]
    pub fn with_size_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    #[inline]
    pub fn with_age_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_age = min;
        self.max_age = max;
        self
    }

    #[inline]
    pub fn with_page(mut self, page: i64, page_size: i64) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Parse raw query-string pairs the way the transport boundary would.
    ///
    /// Unknown keys are ignored and blank values count as absent. A value that
    /// does not parse as its field's numeric type is rejected with the
    /// parameter name in the message. Later duplicates win.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::new();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "category" => criteria.category = parse_text_param(value),
                "subCategory" => criteria.sub_category = parse_text_param(value),
                "minPrice" => criteria.min_price = parse_decimal_param(key, value)?,
                "maxPrice" => criteria.max_price = parse_decimal_param(key, value)?,
                "minProof" => criteria.min_proof = parse_decimal_param(key, value)?,
                "maxProof" => criteria.max_proof = parse_decimal_param(key, value)?,
                "minSize" => criteria.min_size = parse_decimal_param(key, value)?,
                "maxSize" => criteria.max_size = parse_decimal_param(key, value)?,
                "minAge" => criteria.min_age = parse_integer_param(key, value)?,
                "maxAge" => criteria.max_age = parse_integer_param(key, value)?,
                "page" => criteria.page = parse_integer_param(key, value)?,
                "pageSize" => criteria.page_size = parse_integer_param(key, value)?,
                _ => {}
            }
        }
        Ok(criteria)
    }
}

/// Zero-based record offset for a one-based page number.
///
/// Pages at or below zero collapse to the first page. Saturates rather than
/// overflowing.
#[inline]
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    if page > 0 { (page - 1).saturating_mul(page_size) } else { 0 }
}

/// Translate search criteria into a filter map.
///
/// Every supplied criterion contributes exactly one entry. `PageOffset` and
/// `PageSize` are always present, falling back to `defaults` when the
/// criteria leave them unset.
pub fn build_filter_map(criteria: &SearchCriteria, defaults: &PaginationDefaults) -> FilterMap {
    let mut map = FilterMap::default();

    map.insert_opt(FilterKey::Category, criteria.category.clone(), |s| s);
    map.insert_opt(FilterKey::SubCategory, criteria.sub_category.clone(), |s| s);
    map.insert_opt(FilterKey::MinPrice, criteria.min_price, format_decimal);
    map.insert_opt(FilterKey::MaxPrice, criteria.max_price, format_decimal);
    map.insert_opt(FilterKey::MinProof, criteria.min_proof, format_decimal);
    map.insert_opt(FilterKey::MaxProof, criteria.max_proof, format_decimal);
    map.insert_opt(FilterKey::MinSize, criteria.min_size, format_decimal);
    map.insert_opt(FilterKey::MaxSize, criteria.max_size, format_decimal);
    map.insert_opt(FilterKey::MinAge, criteria.min_age, format_integer);
    map.insert_opt(FilterKey::MaxAge, criteria.max_age, format_integer);

    let page = criteria.page.unwrap_or(defaults.page);
    let limit = criteria.page_size.unwrap_or(defaults.page_size);
    let offset = page_offset(page, limit);

    map.insert(FilterKey::PageOffset, format_integer(offset));
    map.insert(FilterKey::PageSize, format_integer(limit));

    debug!("built filter map with {} entries: {:?}", map.len(), map);
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PaginationDefaults {
        PaginationDefaults::new(1, 20)
    }

    fn fully_populated() -> SearchCriteria {
        SearchCriteria {
            category: Some("Whiskey".to_string()),
            sub_category: Some("Bourbon".to_string()),
            min_price: Some(19.5),
            max_price: Some(80.0),
            min_proof: Some(80.0),
            max_proof: Some(120.4),
            min_size: Some(375.0),
            max_size: Some(1750.0),
            min_age: Some(4),
            max_age: Some(12),
            page: Some(2),
            page_size: Some(10),
        }
    }

    #[test]
    fn empty_criteria_yield_only_pagination() {
        let map = build_filter_map(&SearchCriteria::new(), &defaults());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(FilterKey::PageOffset), Some("0"));
        assert_eq!(map.get(FilterKey::PageSize), Some("20"));
        assert_eq!(map.scalar_entries().count(), 0);
    }

    #[test]
    fn every_scalar_criterion_produces_one_entry() {
        let map = build_filter_map(&fully_populated(), &defaults());
        assert_eq!(map.len(), 12);
        assert_eq!(map.scalar_entries().count(), 10);
        for key in FilterKey::SCALAR {
            assert!(map.contains(key), "missing {key:?}");
        }
        assert_eq!(map.get(FilterKey::Category), Some("Whiskey"));
        assert_eq!(map.get(FilterKey::SubCategory), Some("Bourbon"));
        assert_eq!(map.get(FilterKey::MinPrice), Some("19.5"));
        assert_eq!(map.get(FilterKey::MaxPrice), Some("80.0"));
        assert_eq!(map.get(FilterKey::MaxProof), Some("120.4"));
        assert_eq!(map.get(FilterKey::MinSize), Some("375.0"));
        assert_eq!(map.get(FilterKey::MinAge), Some("4"));
        assert_eq!(map.get(FilterKey::MaxAge), Some("12"));
        assert_eq!(map.get(FilterKey::PageOffset), Some("10"));
        assert_eq!(map.get(FilterKey::PageSize), Some("10"));
    }

    #[test]
    fn single_criterion_only_adds_its_own_key() {
        let criteria = SearchCriteria {
            max_proof: Some(100.0),
            ..Default::default()
        };
        let map = build_filter_map(&criteria, &defaults());
        let keys: Vec<_> = map.scalar_entries().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![FilterKey::MaxProof]);
    }

    #[test]
    fn offset_follows_page_arithmetic() {
        let cases = [(1, 0), (3, 40), (0, 0), (-5, 0)];
        for (page, expected) in cases {
            let criteria = SearchCriteria::new().with_page(page, 20);
            let map = build_filter_map(&criteria, &defaults());
            assert_eq!(map.offset(), expected, "page {page}");
            assert_eq!(map.limit(), 20, "page {page}");
        }
    }

    #[test]
    fn missing_page_size_uses_default() {
        let criteria = SearchCriteria {
            page: Some(4),
            ..Default::default()
        };
        let map = build_filter_map(&criteria, &PaginationDefaults::new(1, 25));
        assert_eq!(map.get(FilterKey::PageOffset), Some("75"));
        assert_eq!(map.get(FilterKey::PageSize), Some("25"));
    }

    #[test]
    fn default_page_applies_when_page_missing() {
        let criteria = SearchCriteria {
            page_size: Some(5),
            ..Default::default()
        };
        let map = build_filter_map(&criteria, &PaginationDefaults::new(3, 25));
        assert_eq!(map.get(FilterKey::PageOffset), Some("10"));
        assert_eq!(map.get(FilterKey::PageSize), Some("5"));
    }

    #[test]
    fn inverted_and_negative_values_pass_through() {
        let criteria = SearchCriteria::new()
            .with_price_range(Some(100.0), Some(-1.5))
            .with_page(2, -10);
        let map = build_filter_map(&criteria, &defaults());
        assert_eq!(map.get(FilterKey::MinPrice), Some("100.0"));
        assert_eq!(map.get(FilterKey::MaxPrice), Some("-1.5"));
        assert_eq!(map.get(FilterKey::PageSize), Some("-10"));
        assert_eq!(map.get(FilterKey::PageOffset), Some("-10"));
    }

    #[test]
    fn huge_pages_saturate_instead_of_overflowing() {
        let criteria = SearchCriteria::new().with_page(i64::MAX, i64::MAX);
        let map = build_filter_map(&criteria, &defaults());
        assert_eq!(map.offset(), i64::MAX);
    }

    #[test]
    fn building_is_deterministic() {
        let criteria = fully_populated();
        assert_eq!(
            build_filter_map(&criteria, &defaults()),
            build_filter_map(&criteria, &defaults())
        );
    }

    #[test]
    fn query_pairs_parse_known_params() {
        let criteria = SearchCriteria::from_query_pairs([
            ("category", "Rum"),
            ("subCategory", " "),
            ("minPrice", "12.5"),
            ("maxAge", "8"),
            ("page", "2"),
            ("pageSize", "50"),
            ("sort", "price"),
        ])
        .expect("pairs should parse");

        assert_eq!(criteria.category.as_deref(), Some("Rum"));
        assert_eq!(criteria.sub_category, None);
        assert_eq!(criteria.min_price, Some(12.5));
        assert_eq!(criteria.max_age, Some(8));
        assert_eq!(criteria.page, Some(2));
        assert_eq!(criteria.page_size, Some(50));
    }

    #[test]
    fn query_pairs_reject_malformed_numbers() {
        let err = SearchCriteria::from_query_pairs([("minProof", "strong")]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRequest { .. }));
    }

    #[test]
    fn criteria_deserialize_from_camel_case() {
        let criteria: SearchCriteria =
            serde_json::from_str(r#"{"subCategory":"Rye","maxSize":700.5,"pageSize":5}"#).unwrap();
        assert_eq!(criteria.sub_category.as_deref(), Some("Rye"));
        assert_eq!(criteria.max_size, Some(700.5));
        assert_eq!(criteria.page_size, Some(5));
        assert_eq!(criteria.page, None);
    }

    #[test]
    fn filter_keys_map_to_columns_and_params() {
        assert_eq!(FilterKey::MinPrice.column(), "price");
        assert_eq!(FilterKey::MaxPrice.column(), "price");
        assert_eq!(FilterKey::SubCategory.param(), "subCategory");
        assert!(FilterKey::PageSize.is_pagination());
        assert!(!FilterKey::Category.is_pagination());
    }
}
