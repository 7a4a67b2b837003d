//! # RediSearch-backed catalog store
//!
//! Bottles live as RedisJSON documents at `{prefix}:bottles:{id}` and are
//! indexed by `{prefix}:bottles:idx`. The index is provisioned outside this
//! crate with the fields below:
//!
//! | JSON path         | Field          | Type    |
//! |-------------------|----------------|---------|
//! | `$.category`      | `category`     | TAG     |
//! | `$.subCategory`   | `sub_category` | TAG     |
//! | `$.price`         | `price`        | NUMERIC |
//! | `$.proof`         | `proof`        | NUMERIC |
//! | `$.size`          | `size`         | NUMERIC |
//! | `$.age`           | `age`          | NUMERIC |
//!
//! A filter map turns into one clause per constrained column:
//!
//! ```text
//! CATEGORY=Whiskey, MIN_PRICE=20, MAX_AGE=12
//!   => @category:{Whiskey} @price:[20.0 +inf] @age:[-inf 12.0]
//! ```

use std::borrow::Cow;

use log::{debug, warn};
use redis::{Client, Value, aio::ConnectionManager, cmd, from_redis_value};
use serde_json::Value as JsonValue;

use crate::{
    errors::{CatalogError, CatalogResult},
    filters::{FilterKey, FilterMap, format_decimal, parse_numeric_bound},
    store::CatalogStore,
    types::{Bottle, CategoryTaxonomy},
};

const COLLECTION: &str = "bottles";
const QUERY_DIALECT: i64 = 3;
const TAXONOMY_ROW_LIMIT: u64 = 10_000;

const TAG_KEYS: [FilterKey; 2] = [FilterKey::Category, FilterKey::SubCategory];
const RANGE_KEYS: [(FilterKey, FilterKey); 4] = [
    (FilterKey::MinPrice, FilterKey::MaxPrice),
    (FilterKey::MinProof, FilterKey::MaxProof),
    (FilterKey::MinSize, FilterKey::MaxSize),
    (FilterKey::MinAge, FilterKey::MaxAge),
];

#[derive(Clone)]
pub struct RedisCatalogStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisCatalogStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    /// Open a managed connection to `url` and wrap it in a store.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> CatalogResult<Self> {
        let client = Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self::new(conn, prefix))
    }

    pub fn entity_key(&self, id: &str) -> String {
        format!("{}:{}:{}", self.prefix, COLLECTION, id)
    }

    pub fn index_name(&self) -> String {
        format!("{}:{}:idx", self.prefix, COLLECTION)
    }
}

impl CatalogStore for RedisCatalogStore {
    async fn get_by_id(&self, id: &str) -> CatalogResult<Option<Bottle>> {
        let mut conn = self.conn.clone();
        let key = self.entity_key(id);
        let result: Option<String> = cmd("JSON.GET").arg(&key).query_async(&mut conn).await?;
        match result {
            Some(json) => {
                let payload = normalize_json_payload(json)?;
                Ok(Some(serde_json::from_str::<Bottle>(&payload)?))
            }
            None => Ok(None),
        }
    }

    async fn search(&self, filters: &FilterMap) -> CatalogResult<Vec<Bottle>> {
        let limit = filters.limit();
        if limit <= 0 {
            return Ok(Vec::new());
        }
        let mut offset = filters.offset();
        if offset < 0 {
            warn!("negative page offset {offset} clamped to 0");
            offset = 0;
        }

        let query = build_search_query(filters)?;
        debug!("FT.SEARCH {} {} LIMIT {} {}", self.index_name(), query, offset, limit);

        let mut command = cmd("FT.SEARCH");
        command.arg(self.index_name());
        command.arg(query);
        command.arg("LIMIT").arg(offset).arg(limit);
        command.arg("RETURN").arg(1).arg("$");
        command.arg("DIALECT").arg(QUERY_DIALECT);

        let mut conn = self.conn.clone();
        let raw: Value = command.query_async(&mut conn).await?;
        let values: Vec<Value> = from_redis_value(&raw).map_err(|err| CatalogError::Other {
            message: Cow::Owned(format!("Failed to parse search response: {}", err)),
        })?;

        // [total, key, doc, key, doc, ...]
        let mut items = Vec::new();
        let mut idx = 1;
        while idx + 1 < values.len() {
            let json_payload = extract_json_payload(&values[idx + 1])?;
            items.push(serde_json::from_str::<Bottle>(&json_payload)?);
            idx += 2;
        }
        Ok(items)
    }

    async fn get_categories_map(&self) -> CatalogResult<CategoryTaxonomy> {
        let mut command = cmd("FT.AGGREGATE");
        command.arg(self.index_name());
        command.arg("*");
        command.arg("GROUPBY").arg(2).arg("@category").arg("@sub_category");
        command.arg("LIMIT").arg(0).arg(TAXONOMY_ROW_LIMIT);
        command.arg("DIALECT").arg(QUERY_DIALECT);

        let mut conn = self.conn.clone();
        let raw: Value = command.query_async(&mut conn).await?;
        let values: Vec<Value> = from_redis_value(&raw).map_err(|err| CatalogError::Other {
            message: Cow::Owned(format!("Failed to parse aggregate response: {}", err)),
        })?;

        let taxonomy = collect_taxonomy(&values, TAXONOMY_ROW_LIMIT)?;
        debug!("loaded taxonomy with {} categories", taxonomy.len());
        Ok(taxonomy)
    }
}

/// Fold `FT.AGGREGATE` rows (`[total, row, row, ...]`) into a taxonomy.
///
/// A reply holding `row_limit` rows may have been cut short; that is logged.
fn collect_taxonomy(values: &[Value], row_limit: u64) -> CatalogResult<CategoryTaxonomy> {
    let rows = values.get(1..).unwrap_or_default();
    if rows.len() as u64 >= row_limit {
        warn!(
            "taxonomy aggregate returned {} rows, the LIMIT of {row_limit}; categories may be missing",
            rows.len()
        );
    }

    let mut taxonomy = CategoryTaxonomy::new();
    for row in rows {
        let (category, sub_category) = parse_taxonomy_row(row)?;
        if let Some(category) = category {
            taxonomy.insert(category, sub_category.unwrap_or_default());
        }
    }
    Ok(taxonomy)
}

/// Translate a filter map into a RediSearch query string.
///
/// Pagination keys are ignored here; they become the `LIMIT` clause. An
/// unconstrained map yields `*`.
pub fn build_search_query(filters: &FilterMap) -> CatalogResult<String> {
    let mut clauses = Vec::new();

    for key in TAG_KEYS {
        if let Some(value) = filters.get(key) {
            clauses.push(format!("@{}:{{{}}}", key.column(), escape_for_tag_query(value)));
        }
    }

    for (min_key, max_key) in RANGE_KEYS {
        let min = parse_numeric_bound(min_key.param(), filters.get(min_key))?;
        let max = parse_numeric_bound(max_key.param(), filters.get(max_key))?;
        if min.is_none() && max.is_none() {
            continue;
        }
        let min = min.map_or_else(|| "-inf".to_string(), format_decimal);
        let max = max.map_or_else(|| "+inf".to_string(), format_decimal);
        clauses.push(format!("@{}:[{} {}]", min_key.column(), min, max));
    }

    if clauses.is_empty() {
        Ok("*".to_string())
    } else {
        Ok(clauses.join(" "))
    }
}

/// Escape a value for RediSearch TAG field queries.
///
/// ```
/// use boozedb::store::redisearch::escape_for_tag_query;
///
/// assert_eq!(escape_for_tag_query("Single Malt"), "Single Malt");
/// assert_eq!(escape_for_tag_query("Eau-de-vie"), "Eau\\-de\\-vie");
/// assert_eq!(escape_for_tag_query("St. George"), "St\\. George");
/// ```
pub fn escape_for_tag_query(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '$' | '{' | '}' | '\\' | '|' | '.' | '-' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn parse_taxonomy_row(row: &Value) -> CatalogResult<(Option<String>, Option<String>)> {
    let Value::Array(fields) = row else {
        return Err(CatalogError::Other {
            message: Cow::Owned(format!("Unexpected aggregate row: {:?}", row)),
        });
    };

    let mut category = None;
    let mut sub_category = None;
    for chunk in fields.chunks(2) {
        if chunk.len() != 2 || matches!(chunk[1], Value::Nil) {
            continue;
        }
        let name = value_to_string(&chunk[0])?;
        let value = value_to_string(&chunk[1])?;
        match name.as_str() {
            "category" => category = Some(value),
            "sub_category" => sub_category = Some(value),
            _ => {}
        }
    }
    Ok((category, sub_category))
}

fn extract_json_payload(value: &Value) -> CatalogResult<String> {
    match value {
        Value::Array(items) => {
            for chunk in items.chunks(2) {
                if chunk.len() != 2 {
                    continue;
                }
                let alias = value_to_string(&chunk[0])?;
                if alias == "$" {
                    return normalize_json_payload(value_to_string(&chunk[1])?);
                }
            }
            Err(CatalogError::Other {
                message: Cow::Borrowed("Search response missing JSON payload"),
            })
        }
        other => normalize_json_payload(value_to_string(other)?),
    }
}

/// Dialect 3 wraps JSONPath results in an array; unwrap the first element.
fn normalize_json_payload(mut payload: String) -> CatalogResult<String> {
    let trimmed = payload.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        let value: JsonValue = serde_json::from_str(trimmed)?;
        if let Some(first) = value.as_array().and_then(|arr| arr.first()) {
            payload = serde_json::to_string(first)?;
        }
    }
    Ok(payload)
}

fn value_to_string(value: &Value) -> CatalogResult<String> {
    match value {
        Value::BulkString(bytes) => String::from_utf8(bytes.clone()).map_err(|err| CatalogError::Other {
            message: Cow::Owned(format!("Invalid UTF-8 in search response: {}", err)),
        }),
        Value::SimpleString(status) => Ok(status.clone()),
        Value::Int(v) => Ok(v.to_string()),
        Value::Double(v) => Ok(v.to_string()),
        Value::VerbatimString { text, .. } => Ok(text.clone()),
        _ => from_redis_value::<String>(value).map_err(|err| CatalogError::Other {
            message: Cow::Owned(format!("Unexpected search value type: {}", err)),
        }),
    }
}
