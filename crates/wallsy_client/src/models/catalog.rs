// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Top-level body of a catalog search response.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub(crate) struct SearchResponse {
    pub collection: SearchCollection,
}

/// The collection wrapper around the ordered result items.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub(crate) struct SearchCollection {
    #[serde(default)]
    pub items: Vec<SearchResultItem>,
}

/// A single raw search hit, before its asset manifest has been looked up.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub(crate) struct SearchResultItem {
    /// Address of the asset manifest for this item (the secondary lookup).
    pub href: Option<String>,
    /// Metadata records; only the first one is used.
    #[serde(default)]
    pub data: Vec<ItemMetadata>,
    /// Preview links. The first entry is the thumbnail.
    pub links: Option<Vec<ItemLink>>,
}

impl SearchResultItem {
    /// Catalog identifier of the item, if the metadata carries one.
    pub fn id(&self) -> Option<&str> {
        self.data
            .first()
            .map(|meta| meta.nasa_id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// Descriptive metadata attached to a search hit.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub(crate) struct ItemMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Stable catalog identifier.
    #[serde(default)]
    pub nasa_id: String,
    /// Creation timestamp, kept as the catalog's string.
    #[serde(default)]
    pub date_created: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub(crate) struct ItemLink {
    #[serde(default)]
    pub href: String,
}

/// Every file variant address of one catalog item, in the order the catalog lists them.
pub(crate) type AssetManifest = Vec<String>;
