// SPDX-License-Identifier: Apache-2.0

use std::pin::pin;

use futures::{StreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::assets::{select_full_image_url, thumbnail_url};
use crate::config::{ClientConfig, DeliveryMode, FailurePolicy};
use crate::error::{ItemResolutionFailed, SearchError};
use crate::fetch::{build_client, fetch_catalog, fetch_manifest};
use crate::models::aggregation::SearchReport;
use crate::models::catalog::SearchResultItem;
use crate::models::record::{ImageRecord, RecordDelivery};

/// Receives records as a search produces them.
///
/// A search never calls its sink from two places at once, and never after it has returned.
pub(crate) trait RecordSink: Send + Sync {
    fn deliver(&self, delivery: RecordDelivery);
}

impl<F> RecordSink for F
where
    F: Fn(RecordDelivery) + Send + Sync,
{
    fn deliver(&self, delivery: RecordDelivery) {
        self(delivery)
    }
}

/// Searches the image catalog and resolves each hit's full-resolution address.
pub(crate) struct ImageSearchAggregator {
    client: reqwest::Client,
    config: ClientConfig,
    cancel: CancellationToken,
}

impl ImageSearchAggregator {
    pub fn new(config: ClientConfig) -> Result<Self, SearchError> {
        let client = build_client(&config)?;
        Ok(Self {
            client,
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Stops the search at its next suspension point once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Runs one search, handing records to `sink` as they become ready.
    ///
    /// Only the catalog request can fail the search. Items that cannot be resolved are
    /// logged and left out (or left unresolved in progressive mode); under
    /// [`FailurePolicy::Collect`] they are also listed in the returned report.
    pub async fn search<S>(&self, term: &str, sink: &S) -> Result<SearchReport, SearchError>
    where
        S: RecordSink + ?Sized,
    {
        info!(term, mode = ?self.config.mode, "Starting image search");

        let items = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                info!(term, "Search cancelled before the catalog responded");
                return Ok(SearchReport { cancelled: true, ..Default::default() });
            }
            items = fetch_catalog(&self.client, &self.config, term) => items?,
        };

        let mut report = SearchReport {
            items: items.len(),
            ..Default::default()
        };

        match self.config.mode {
            DeliveryMode::Sequential => self.run_sequential(&items, sink, &mut report).await,
            DeliveryMode::Progressive => self.run_progressive(&items, sink, &mut report).await,
        }

        info!(
            term,
            items = report.items,
            deliveries = report.deliveries,
            cancelled = report.cancelled,
            "Image search finished"
        );
        Ok(report)
    }

    async fn run_sequential<S>(&self, items: &[SearchResultItem], sink: &S, report: &mut SearchReport)
    where
        S: RecordSink + ?Sized,
    {
        for (index, item) in items.iter().enumerate() {
            let resolved = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                resolved = async {
                    tokio::time::sleep(self.config.throttle).await;
                    match preliminary_record(index, item) {
                        Ok(record) => self.complete_record(record, item.href.as_deref()).await,
                        Err(err) => Err(err),
                    }
                } => resolved,
            };

            match resolved {
                Ok(record) => {
                    sink.deliver(RecordDelivery::Resolved(record));
                    report.deliveries += 1;
                }
                Err(err) => self.record_failure(report, err),
            }
        }
    }

    async fn run_progressive<S>(&self, items: &[SearchResultItem], sink: &S, report: &mut SearchReport)
    where
        S: RecordSink + ?Sized,
    {
        // Every preliminary goes out before any lookup starts, so each item's
        // preliminary delivery precedes its resolved one.
        let mut pending = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match preliminary_record(index, item) {
                Ok(record) => {
                    sink.deliver(RecordDelivery::Preliminary(record.clone()));
                    report.deliveries += 1;
                    pending.push((record, item.href.as_deref()));
                }
                Err(err) => self.record_failure(report, err),
            }
        }

        let width = match self.config.concurrency {
            0 => pending.len().max(1),
            n => n,
        };
        debug!(lookups = pending.len(), width, "Resolving asset manifests");

        let mut lookups = pin!(
            stream::iter(pending)
                .map(|(record, href)| self.complete_record(record, href))
                .buffer_unordered(width)
        );

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                next = lookups.next() => next,
            };

            match next {
                Some(Ok(record)) => {
                    sink.deliver(RecordDelivery::Resolved(record));
                    report.deliveries += 1;
                }
                Some(Err(err)) => self.record_failure(report, err),
                None => break,
            }
        }
    }

    /// Looks up the asset manifest behind `href` and fills in the full-resolution address.
    async fn complete_record(
        &self,
        record: ImageRecord,
        href: Option<&str>,
    ) -> Result<ImageRecord, ItemResolutionFailed> {
        let Some(href) = href else {
            return Err(ItemResolutionFailed {
                item: record.id,
                reason: "item has no asset manifest address".to_string(),
            });
        };

        let manifest = fetch_manifest(&self.client, href)
            .await
            .map_err(|e| ItemResolutionFailed {
                item: record.id.clone(),
                reason: format!("{e:#}"),
            })?;

        Ok(ImageRecord {
            full_image_url: select_full_image_url(&manifest),
            ..record
        })
    }

    fn record_failure(&self, report: &mut SearchReport, failure: ItemResolutionFailed) {
        warn!(item = %failure.item, error = %failure.reason, "Failed to resolve image, skipping");
        if self.config.failure_policy == FailurePolicy::Collect {
            report.failures.push(failure);
        }
    }
}

/// Builds the record for an item from what the catalog already returned.
/// `full_image_url` stays empty.
fn preliminary_record(
    index: usize,
    item: &SearchResultItem,
) -> Result<ImageRecord, ItemResolutionFailed> {
    let failure = |reason: &str| ItemResolutionFailed {
        item: format!("#{}", index + 1),
        reason: reason.to_string(),
    };

    let meta = item.data.first().ok_or_else(|| failure("item has no metadata"))?;
    let id = item.id().ok_or_else(|| failure("item has no catalog identifier"))?;

    Ok(ImageRecord {
        title: meta.title.clone(),
        description: meta.description.clone(),
        id: id.to_string(),
        date_created: meta.date_created.clone(),
        thumbnail_url: thumbnail_url(item.links.as_deref()),
        full_image_url: String::new(),
    })
}
