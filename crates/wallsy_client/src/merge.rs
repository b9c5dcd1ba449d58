// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use crate::models::record::{ImageRecord, RecordDelivery};

/// Merges deliveries by record `id`, in the order each id was first seen.
///
/// A resolved record replaces whatever is stored for its id. A preliminary record
/// never overwrites a resolved one.
#[derive(Debug, Default)]
pub(crate) struct RecordBook {
    order: Vec<String>,
    entries: HashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    record: ImageRecord,
    resolved: bool,
}

impl RecordBook {
    /// Applies one delivery. Returns true if the stored record changed.
    pub fn apply(&mut self, delivery: RecordDelivery) -> bool {
        let resolved = delivery.is_resolved();
        let record = match delivery {
            RecordDelivery::Preliminary(record) | RecordDelivery::Resolved(record) => record,
        };

        match self.entries.get_mut(&record.id) {
            Some(entry) if entry.resolved && !resolved => false,
            Some(entry) => {
                let changed = entry.record != record || entry.resolved != resolved;
                *entry = Entry { record, resolved };
                changed
            }
            None => {
                self.order.push(record.id.clone());
                self.entries.insert(record.id.clone(), Entry { record, resolved });
                true
            }
        }
    }

    pub fn records(&self) -> Vec<&ImageRecord> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|entry| &entry.record)
            .collect()
    }

    /// Ids whose full-resolution address has not been resolved yet.
    pub fn unresolved(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| self.entries.get(*id).is_some_and(|entry| !entry.resolved))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, full: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            title: format!("Title {id}"),
            full_image_url: full.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn resolved_replaces_preliminary_in_place() {
        let mut book = RecordBook::default();
        assert!(book.apply(RecordDelivery::Preliminary(record("A", ""))));
        assert!(book.apply(RecordDelivery::Preliminary(record("B", ""))));
        assert!(book.apply(RecordDelivery::Resolved(record("A", "https://x/a~orig.jpg"))));

        let records = book.records();
        assert_eq!(book.len(), 2);
        assert_eq!(records[0].id, "A");
        assert_eq!(records[0].full_image_url, "https://x/a~orig.jpg");
        assert_eq!(records[1].id, "B");
        assert_eq!(book.unresolved(), vec!["B"]);
    }

    #[test]
    fn late_preliminary_does_not_downgrade() {
        let mut book = RecordBook::default();
        book.apply(RecordDelivery::Resolved(record("A", "https://x/a.jpg")));
        assert!(!book.apply(RecordDelivery::Preliminary(record("A", ""))));
        assert_eq!(book.records()[0].full_image_url, "https://x/a.jpg");
        assert!(book.unresolved().is_empty());
    }

    #[test]
    fn repeated_delivery_reports_no_change() {
        let mut book = RecordBook::default();
        assert!(book.is_empty());
        book.apply(RecordDelivery::Resolved(record("A", "https://x/a.jpg")));
        assert!(!book.apply(RecordDelivery::Resolved(record("A", "https://x/a.jpg"))));
        assert_eq!(book.len(), 1);
    }
}
