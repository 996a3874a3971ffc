//! Cache capability shared by every record store.

use crate::record::StoreRecord;

/// Synchronous, local-only view of cached records.
///
/// Implementations never perform network I/O. Records are matched by identity;
/// "related" records for the `*_all` operations are all records of the same
/// collection the implementation keeps for `T`.
pub trait CacheManager<T: StoreRecord>: Send + Sync {
  /// Cached entry with the same identity as `record`, or `None` on a miss.
  fn peek(&self, record: &T) -> Option<T>;

  /// All cached entries related to `record`. Order is unspecified.
  fn peek_all(&self, record: &T) -> Vec<T>;

  /// Evict the entry with the same identity as `record`. A miss is a no-op.
  fn remove(&self, record: &T);

  /// Evict every entry related to `record`.
  fn remove_all(&self, record: &T);
}
