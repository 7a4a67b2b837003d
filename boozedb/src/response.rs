use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::{
    links::{BottleLinks, BottleListLinks},
    types::Bottle,
};

/// A single bottle together with its links.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleResponse {
    pub bottle: Bottle,
    pub links: BottleLinks,
}

/// One page of search results together with its links.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleListResponse {
    pub links: BottleListLinks,
    pub results: Vec<Bottle>,
}

impl BottleListResponse {
    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
