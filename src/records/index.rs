//! Derived index from handoff value to its record group.

use crate::types::{Record, RecordId};
use std::collections::HashMap;

/// Index mapping each handoff value to the records currently sharing it.
///
/// This is a derived structure over the record store: after any board
/// mutation it must reflect the store exactly, with no stale entries and no
/// missing entries. Groups preserve the records' relative store order.
/// Records with an empty handoff value are not indexed.
#[derive(Debug, Default)]
pub struct HandoffIndex {
    groups: HashMap<String, Vec<Record>>,
}

impl HandoffIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records sharing a handoff value, in store order. Empty if absent.
    pub fn lookup(&self, handoff_value: &str) -> &[Record] {
        self.groups
            .get(handoff_value)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, handoff_value: &str) -> bool {
        self.groups.contains_key(handoff_value)
    }

    /// Clear and repopulate by grouping records by handoff value,
    /// preserving insertion order within each group.
    pub fn rebuild(&mut self, records: &[Record]) {
        self.groups.clear();
        for record in records {
            if record.handoff_value.is_empty() {
                continue;
            }
            self.groups
                .entry(record.handoff_value.clone())
                .or_default()
                .push(record.clone());
        }
    }

    /// Replace the group for a key wholesale. An empty group removes the
    /// key so a lookup never reports a key with no records.
    pub fn put(&mut self, handoff_value: impl Into<String>, records: Vec<Record>) {
        let key = handoff_value.into();
        if records.is_empty() {
            self.groups.remove(&key);
        } else {
            self.groups.insert(key, records);
        }
    }

    /// Remove the group for a key entirely.
    pub fn delete(&mut self, handoff_value: &str) -> Option<Vec<Record>> {
        self.groups.remove(handoff_value)
    }

    /// Drop a single record from its group, removing the group when it
    /// empties. Returns whether the record was indexed.
    pub fn remove_record(&mut self, handoff_value: &str, id: RecordId) -> bool {
        let Some(group) = self.groups.get_mut(handoff_value) else {
            return false;
        };
        let Some(pos) = group.iter().position(|r| r.id == id) else {
            return false;
        };
        group.remove(pos);
        if group.is_empty() {
            self.groups.remove(handoff_value);
        }
        true
    }

    /// Number of distinct handoff values indexed.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
