use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

/// Page number used when a search does not name one.
pub const DEFAULT_PAGE_OFFSET: i64 = 1;
/// Page size used when a search does not name one.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// A single catalog record.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottle {
    pub id: String,
    pub name: String,
    pub category: String,
    pub sub_category: String,
    /// Retail price.
    pub price: f64,
    /// Alcohol proof (twice the ABV).
    pub proof: f64,
    /// Volume in millilitres.
    pub size: f64,
    /// Age statement in years, when the label carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

/// Category name to its ordered sub-category names.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTaxonomy(BTreeMap<String, Vec<String>>);

impl CategoryTaxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn sub_categories(&self, category: &str) -> Option<&[String]> {
        self.0.get(category).map(Vec::as_slice)
    }

    /// Record `sub_category` under `category`, keeping first-seen order and
    /// skipping duplicates. An empty sub-category only registers the category.
    pub fn insert(&mut self, category: impl Into<String>, sub_category: impl Into<String>) {
        let entry = self.0.entry(category.into()).or_default();
        let sub_category = sub_category.into();
        if !sub_category.is_empty() && !entry.contains(&sub_category) {
            entry.push(sub_category);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, Vec<String>>> for CategoryTaxonomy {
    fn from(value: BTreeMap<String, Vec<String>>) -> Self {
        Self(value)
    }
}

impl FromIterator<(String, String)> for CategoryTaxonomy {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut taxonomy = Self::new();
        for (category, sub_category) in iter {
            taxonomy.insert(category, sub_category);
        }
        taxonomy
    }
}

/// Pagination values applied when a search leaves page or page size unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationDefaults {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for PaginationDefaults {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_OFFSET,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationDefaults {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }
}

fn default_page() -> i64 {
    DEFAULT_PAGE_OFFSET
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_keeps_first_seen_order_without_duplicates() {
        let taxonomy: CategoryTaxonomy = [
            ("Whiskey", "Bourbon"),
            ("Whiskey", "Rye"),
            ("Rum", "Agricole"),
            ("Whiskey", "Bourbon"),
            ("Gin", ""),
        ]
        .into_iter()
        .map(|(c, s)| (c.to_string(), s.to_string()))
        .collect();

        assert_eq!(taxonomy.len(), 3);
        assert_eq!(
            taxonomy.sub_categories("Whiskey"),
            Some(&["Bourbon".to_string(), "Rye".to_string()][..])
        );
        assert_eq!(taxonomy.sub_categories("Gin"), Some(&[][..]));
    }

    #[test]
    fn bottle_serializes_camel_case_and_skips_missing_age() {
        let bottle = Bottle {
            id: "b1".to_string(),
            name: "Old Reliable".to_string(),
            category: "Whiskey".to_string(),
            sub_category: "Bourbon".to_string(),
            price: 29.99,
            proof: 90.0,
            size: 750.0,
            age: None,
        };
        let json = serde_json::to_value(&bottle).unwrap();
        assert_eq!(json["subCategory"], "Bourbon");
        assert!(json.get("age").is_none());
    }
}
