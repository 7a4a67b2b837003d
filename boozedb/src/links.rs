//! Navigation links attached to catalog responses.

use serde::{Deserialize, Serialize};
use url::Url;

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::{errors::CatalogError, types::Bottle};

/// What the transport boundary knows about the request being answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_url: Url,
}

impl RequestContext {
    pub fn new(request_url: Url) -> Self {
        Self { request_url }
    }

    pub fn parse(request_url: &str) -> Result<Self, CatalogError> {
        let request_url = Url::parse(request_url)
            .map_err(|err| CatalogError::invalid_request(format!("Invalid request url {request_url}: {err}")))?;
        Ok(Self::new(request_url))
    }

    /// Query pairs of the request, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.request_url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottleLinks {
    #[serde(rename = "self")]
    pub self_href: String,
    /// Whether the link describes a bottle that was not found.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_found: bool,
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottleListLinks {
    #[serde(rename = "self")]
    pub self_href: String,
    pub result_size: usize,
}

/// Builds the links for single-bottle and list responses.
pub trait ResponseAssembler {
    /// Links for a lookup. `None` means the bottle was not found.
    fn bottle_links(&self, bottle: Option<&Bottle>, ctx: &RequestContext) -> BottleLinks;

    fn list_links(&self, ctx: &RequestContext, result_size: usize) -> BottleListLinks;
}

/// Emits a single `self` link per response.
///
/// Found bottles link to their canonical `{base}/bottles/{id}` location;
/// everything else links back to the request URL.
#[derive(Debug, Clone)]
pub struct DefaultAssembler {
    base_url: Url,
}

impl DefaultAssembler {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn parse(base_url: &str) -> Result<Self, CatalogError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| CatalogError::config(format!("Invalid links base url {base_url}: {err}")))?;
        Ok(Self::new(base_url))
    }

    fn bottle_url(&self, id: &str) -> Option<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut().ok()?.pop_if_empty().push("bottles").push(id);
        url.set_query(None);
        Some(url)
    }
}

impl ResponseAssembler for DefaultAssembler {
    fn bottle_links(&self, bottle: Option<&Bottle>, ctx: &RequestContext) -> BottleLinks {
        match bottle.and_then(|b| self.bottle_url(&b.id)) {
            Some(url) => BottleLinks {
                self_href: url.into(),
                not_found: false,
            },
            None => BottleLinks {
                self_href: ctx.request_url.to_string(),
                not_found: bottle.is_none(),
            },
        }
    }

    fn list_links(&self, ctx: &RequestContext, result_size: usize) -> BottleListLinks {
        BottleListLinks {
            self_href: ctx.request_url.to_string(),
            result_size,
        }
    }
}
