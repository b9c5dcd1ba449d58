// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum SearchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientSetup(#[source] reqwest::Error),

    #[error("Catalog search for '{term}' failed: {source}")]
    CatalogUnavailable {
        term: String,
        #[source]
        source: reqwest::Error,
    },
}

/// One item that was dropped (sequential) or never resolved (progressive).
///
/// Recovered inside a search and never returned from it.
#[derive(Debug, Error, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[error("Failed to resolve item '{item}': {reason}")]
pub(crate) struct ItemResolutionFailed {
    /// Catalog identifier, or the item's position when it has none.
    pub item: String,
    pub reason: String,
}
