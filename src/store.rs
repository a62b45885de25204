//! Shared record store.
//!
//! The store holds one immutable [`Generation`] at a time. A sync builds the
//! next generation off to the side and swaps it in with [`Store::replace`];
//! readers clone the current `Arc` and never see a half-built set.

use crate::feed::types::NormalizedRecord;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// The complete result of one successful sync, keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    records: HashMap<String, NormalizedRecord>,
}

impl Generation {
    /// Later records with an already-seen id overwrite earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = NormalizedRecord>) -> Self {
        let mut by_id = HashMap::new();
        for record in records {
            by_id.insert(record.id.clone(), record);
        }
        Self { records: by_id }
    }

    pub fn get(&self, id: &str) -> Option<&NormalizedRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, newest first. Equal timestamps keep map iteration order.
    pub fn sorted(&self) -> Vec<NormalizedRecord> {
        let mut out: Vec<NormalizedRecord> = self.records.values().cloned().collect();
        out.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        out
    }
}

pub struct Store {
    current: RwLock<Arc<Generation>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Generation::default())),
        }
    }

    /// The generation visible right now. Holding it pins that generation.
    pub fn snapshot(&self) -> Arc<Generation> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new generation. Only the synchronizer writes.
    pub(crate) fn replace(&self, next: Generation) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }

    /// Every stored record, most recently published first.
    pub fn list_all(&self) -> Vec<NormalizedRecord> {
        self.snapshot().sorted()
    }

    pub fn get(&self, id: &str) -> Option<NormalizedRecord> {
        self.snapshot().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}
