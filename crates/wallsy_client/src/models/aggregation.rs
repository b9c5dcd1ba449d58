// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::error::ItemResolutionFailed;

/// Outcome of a search that got past the catalog request.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub(crate) struct SearchReport {
    /// Catalog items considered, after truncation.
    pub items: usize,
    /// Sink invocations made, preliminary and resolved together.
    pub deliveries: usize,
    /// Items whose resolution failed. Only filled under the `collect` policy.
    pub failures: Vec<ItemResolutionFailed>,
    /// True if the search stopped early on cancellation.
    pub cancelled: bool,
}

