// SPDX-License-Identifier: Apache-2.0

pub(crate) mod aggregation;
pub(crate) mod catalog;
pub(crate) mod record;
