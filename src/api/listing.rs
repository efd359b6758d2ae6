use serde::Deserialize;

use crate::models::{DirectoryListing, RemoteEntry};

/// Body of `GET /resources`. Directory contents are usually nested under
/// `_embedded`, but flat-list endpoints put them at the top level.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ResourcePage {
    #[serde(default)]
    items: Option<Vec<RemoteEntry>>,
    #[serde(default, rename = "_embedded")]
    embedded: Option<EmbeddedItems>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    offset: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddedItems {
    #[serde(default)]
    items: Option<Vec<RemoteEntry>>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DownloadLinkBody {
    #[serde(default)]
    pub href: Option<String>,
}

impl ResourcePage {
    /// Top-level `items` wins over `_embedded.items`; neither means an empty page.
    pub(super) fn into_listing(self, path: &str, limit: u32, offset: u32) -> DirectoryListing {
        let embedded = self.embedded.unwrap_or_default();
        let (items, total) = match self.items {
            Some(items) => (items, None),
            None => (embedded.items.unwrap_or_default(), embedded.total),
        };

        DirectoryListing {
            path: path.to_string(),
            items,
            total,
            limit: embedded.limit.or(self.limit).unwrap_or(limit),
            offset: embedded.offset.or(self.offset).unwrap_or(offset),
        }
    }
}
