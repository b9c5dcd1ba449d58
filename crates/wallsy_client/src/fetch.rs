// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::{ClientConfig, DEFAULT_MAX_ITEMS};
use crate::error::SearchError;
use crate::models::catalog::{AssetManifest, SearchResponse, SearchResultItem};

pub(crate) fn build_client(config: &ClientConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(SearchError::ClientSetup)
}

/// Runs the catalog search and returns at most `max_items` hits, in catalog order.
///
/// `max_items` can lower the fan-out but never raise it above [`DEFAULT_MAX_ITEMS`].
pub(crate) async fn fetch_catalog(
    client: &reqwest::Client,
    config: &ClientConfig,
    term: &str,
) -> Result<Vec<SearchResultItem>, SearchError> {
    let unavailable = |source| SearchError::CatalogUnavailable {
        term: term.to_string(),
        source,
    };

    debug!(url = %config.search_url, term, "Requesting catalog search");
    let response: SearchResponse = client
        .get(&config.search_url)
        .query(&[("q", term), ("media_type", "image")])
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(unavailable)?
        .json::<SearchResponse>()
        .await
        .map_err(unavailable)?;

    let mut items = response.collection.items;
    let total = items.len();
    items.truncate(config.max_items.min(DEFAULT_MAX_ITEMS));
    debug!(term, total, kept = items.len(), "Catalog search returned");
    Ok(items)
}

/// Fetches the list of file variants behind an item's asset address.
pub(crate) async fn fetch_manifest(client: &reqwest::Client, href: &str) -> Result<AssetManifest> {
    debug!(href, "Requesting asset manifest");
    let response = client
        .get(href)
        .send()
        .await
        .with_context(|| format!("Failed to send request to asset manifest '{}'", href))?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Failed to fetch asset manifest '{}': HTTP Status {}",
            href,
            response.status()
        );
    }

    response
        .json::<AssetManifest>()
        .await
        .with_context(|| format!("Failed to parse asset manifest from '{}'", href))
}
