//! The result store accumulated during one run.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::tasks::{Identifier, Status, TaskResult};

/// One task's stored outcome.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub identifier: Identifier,
    pub result: Arc<TaskResult>,
    /// Set when the result came from an override instead of `execute`.
    pub was_override: bool,
    pub duration: Duration,
}

impl Serialize for TaskRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TaskRecord", 3)?;
        state.serialize_field("Identifier", &self.identifier)?;
        state.serialize_field("Override", &self.was_override)?;
        state.serialize_field("Result", self.result.as_ref())?;
        state.end()
    }
}

/// Write-once map of identifier to result, remembering completion order.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: HashMap<Identifier, TaskRecord>,
    order: Vec<Identifier>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record. Returns `false`, leaving the first record in place,
    /// if the identifier already has one.
    pub fn insert(&mut self, record: TaskRecord) -> bool {
        if self.records.contains_key(&record.identifier) {
            tracing::warn!(
                "Ignoring second result for {}; results are write-once",
                record.identifier
            );
            return false;
        }
        self.order.push(record.identifier.clone());
        self.records.insert(record.identifier.clone(), record);
        true
    }

    pub fn get(&self, identifier: &Identifier) -> Option<&TaskRecord> {
        self.records.get(identifier)
    }

    /// Result for an identifier given as a string.
    pub fn result(&self, identifier: &str) -> Option<&TaskResult> {
        let id: Identifier = identifier.parse().ok()?;
        self.records.get(&id).map(|r| r.result.as_ref())
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.records.contains_key(identifier)
    }

    /// Records in completion order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Identifiers in completion order.
    pub fn completion_order(&self) -> &[Identifier] {
        &self.order
    }

    /// Records in identifier order.
    pub fn sorted(&self) -> Vec<&TaskRecord> {
        let mut records: Vec<&TaskRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most severe status in the store, `None` when empty.
    pub fn worst_status(&self) -> Status {
        self.records
            .values()
            .map(|r| r.result.status)
            .max()
            .unwrap_or_default()
    }

    /// Number of results per status.
    pub fn counts(&self) -> BTreeMap<Status, usize> {
        let mut counts = BTreeMap::new();
        for record in self.records.values() {
            *counts.entry(record.result.status).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, status: Status) -> TaskRecord {
        TaskRecord {
            identifier: Identifier::new("Test", "Store", name),
            result: Arc::new(TaskResult::new(status, name)),
            was_override: false,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn insert_is_write_once() {
        let mut store = ResultStore::new();
        assert!(store.insert(record("a", Status::Success)));
        assert!(!store.insert(record("a", Status::Error)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.result("Test/Store/a").unwrap().status, Status::Success);
    }

    #[test]
    fn iter_follows_completion_order_and_sorted_follows_identifier() {
        let mut store = ResultStore::new();
        store.insert(record("b", Status::Success));
        store.insert(record("a", Status::Success));

        let completion: Vec<&str> = store.iter().map(|r| r.identifier.name.as_str()).collect();
        assert_eq!(completion, vec!["b", "a"]);
        let sorted: Vec<&str> = store.sorted().iter().map(|r| r.identifier.name.as_str()).collect();
        assert_eq!(sorted, vec!["a", "b"]);
    }

    #[test]
    fn worst_status_and_counts() {
        let mut store = ResultStore::new();
        assert_eq!(store.worst_status(), Status::None);
        store.insert(record("a", Status::Success));
        store.insert(record("b", Status::Warning));
        store.insert(record("c", Status::Success));

        assert_eq!(store.worst_status(), Status::Warning);
        assert_eq!(store.counts().get(&Status::Success), Some(&2));
    }

    #[test]
    fn record_json_shape() {
        let json = serde_json::to_value(record("a", Status::Info)).unwrap();
        assert_eq!(json["Identifier"], "Test/Store/a");
        assert_eq!(json["Override"], false);
        assert_eq!(json["Result"]["Status"], "Info");
    }
}
