//! The authoritative ordered record collection.

use crate::types::{Record, RecordId};

/// Ordered, authoritative collection of routing records.
///
/// `replace_all` is the only bulk-mutation entry point; the board pairs
/// every mutation here with the matching index patch and a pagination
/// recompute, so the two can never be observed out of step.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in authoritative order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Replace the entire content. The sole bulk-mutation entry point,
    /// used by import and by the upsert commit.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    /// Remove one record by identity. Returns it if present.
    pub fn remove_by_id(&mut self, id: RecordId) -> Option<Record> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }
}
