//! In-memory cache backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::traits::CacheManager;
use crate::record::StoreRecord;

/// Cache holding one collection of records in a map keyed by identity.
///
/// No eviction policy or size bound: entries live until removed.
pub struct MemoryCache<T: StoreRecord> {
  entries: Mutex<HashMap<T::Id, T>>,
}

impl<T: StoreRecord> MemoryCache<T> {
  pub fn new() -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
    }
  }

  /// Store a record, replacing any entry with the same identity.
  pub fn insert(&self, record: T) {
    self.lock().insert(record.id().clone(), record);
  }

  /// Store several records (upsert by identity).
  pub fn insert_all(&self, records: impl IntoIterator<Item = T>) {
    let mut entries = self.lock();
    for record in records {
      entries.insert(record.id().clone(), record);
    }
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<T::Id, T>> {
    // A panic while holding the lock cannot leave the map half-written
    self
      .entries
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl<T: StoreRecord> Default for MemoryCache<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: StoreRecord> CacheManager<T> for MemoryCache<T> {
  fn peek(&self, record: &T) -> Option<T> {
    self.lock().get(record.id()).cloned()
  }

  fn peek_all(&self, _record: &T) -> Vec<T> {
    self.lock().values().cloned().collect()
  }

  fn remove(&self, record: &T) {
    self.lock().remove(record.id());
  }

  fn remove_all(&self, _record: &T) {
    self.lock().clear();
  }
}
