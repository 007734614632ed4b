//! Configuration sink abstraction and the in-memory implementation.
//!
//! The pipeline does not know what consumes its flat entries; it hands each
//! successful render's output to a [`ConfigSink`] as one ordered batch. The
//! sink owns atomicity: a batch must become visible to readers as a whole.
//! [`MemorySink`] is the in-crate implementation, an ordered key/value store
//! guarded by a single lock.

use std::sync::RwLock;

use crate::tree::flatten::FlatEntry;

/// Receiver of flattened configuration entries.
///
/// Implementations must make each `insert_batch` call atomic with respect to
/// reads. Concurrent batches from overlapping reloads may interleave at the
/// batch level; the last completed batch wins per key.
pub trait ConfigSink: Send + Sync {
    /// Insert a batch of entries, preserving their order.
    ///
    /// An entry whose key is already present replaces the stored value in
    /// place; new keys are appended in batch order.
    fn insert_batch(&self, entries: Vec<FlatEntry>);
}

/// In-memory ordered configuration store.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: RwLock<Vec<FlatEntry>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored value by key.
    ///
    /// Returns `None` when the key is absent, `Some(None)` when it is stored
    /// as an explicit null, and `Some(Some(text))` otherwise.
    pub fn get(&self, key: &str) -> Option<Option<String>> {
        let entries = self.entries.read().expect("sink lock poisoned");
        entries.iter().find(|e| e.key == key).map(|e| e.value.clone())
    }

    /// Snapshot of all stored entries, in insertion order.
    pub fn entries(&self) -> Vec<FlatEntry> {
        self.entries.read().expect("sink lock poisoned").clone()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().expect("sink lock poisoned").len()
    }

    /// Whether the sink holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConfigSink for MemorySink {
    fn insert_batch(&self, batch: Vec<FlatEntry>) {
        let mut entries = self.entries.write().expect("sink lock poisoned");
        for entry in batch {
            match entries.iter_mut().find(|e| e.key == entry.key) {
                Some(existing) => existing.value = entry.value,
                None => entries.push(entry),
            }
        }
    }
}
