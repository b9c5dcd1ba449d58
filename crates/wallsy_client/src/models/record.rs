// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// The normalized unit handed to a sink.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageRecord {
    pub title: String,
    pub description: String,
    /// Stable catalog identifier; consumers key on it.
    pub id: String,
    /// Not parsed or validated.
    pub date_created: String,
    pub thumbnail_url: String,
    /// Empty until the asset manifest has been resolved, or if it had no usable image.
    pub full_image_url: String,
}

/// One delivery to a sink.
///
/// Sequential searches only ever produce `Resolved`. Progressive searches emit a
/// `Preliminary` per item first and, if its manifest lookup succeeds, a `Resolved`
/// for the same `id` later.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub(crate) enum RecordDelivery {
    Preliminary(ImageRecord),
    Resolved(ImageRecord),
}

impl RecordDelivery {
    pub fn record(&self) -> &ImageRecord {
        match self {
            RecordDelivery::Preliminary(record) | RecordDelivery::Resolved(record) => record,
        }
    }

    pub fn id(&self) -> &str {
        &self.record().id
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, RecordDelivery::Resolved(_))
    }
}
