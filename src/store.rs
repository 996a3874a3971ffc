//! Record store: one network manager and one cache manager per record type.

use async_trait::async_trait;
use std::marker::PhantomData;

use crate::cache::CacheManager;
use crate::error::Result;
use crate::network::NetworkManager;
use crate::record::StoreRecord;

/// Anything offering both the network and the cache capability for `T`.
pub trait StoreManager<T: StoreRecord>: NetworkManager<T> + CacheManager<T> {}

impl<T, S> StoreManager<T> for S
where
  T: StoreRecord,
  S: NetworkManager<T> + CacheManager<T>,
{
}

/// Store exposing the operations of its network and cache managers under one
/// name.
///
/// The two sides are independent: fetching does not fill the cache and
/// mutations do not invalidate it. Callers coordinate them explicitly.
pub struct Store<T, N, C>
where
  T: StoreRecord,
  N: NetworkManager<T>,
  C: CacheManager<T>,
{
  network: N,
  cache: C,
  _record: PhantomData<fn() -> T>,
}

impl<T, N, C> Store<T, N, C>
where
  T: StoreRecord,
  N: NetworkManager<T>,
  C: CacheManager<T>,
{
  pub fn new(network: N, cache: C) -> Self {
    Self {
      network,
      cache,
      _record: PhantomData,
    }
  }

  pub fn network(&self) -> &N {
    &self.network
  }

  pub fn cache(&self) -> &C {
    &self.cache
  }

  pub fn into_parts(self) -> (N, C) {
    (self.network, self.cache)
  }
}

impl<T, N, C> CacheManager<T> for Store<T, N, C>
where
  T: StoreRecord,
  N: NetworkManager<T>,
  C: CacheManager<T>,
{
  fn peek(&self, record: &T) -> Option<T> {
    self.cache.peek(record)
  }

  fn peek_all(&self, record: &T) -> Vec<T> {
    self.cache.peek_all(record)
  }

  fn remove(&self, record: &T) {
    self.cache.remove(record)
  }

  fn remove_all(&self, record: &T) {
    self.cache.remove_all(record)
  }
}

#[async_trait]
impl<T, N, C> NetworkManager<T> for Store<T, N, C>
where
  T: StoreRecord,
  N: NetworkManager<T>,
  C: CacheManager<T>,
{
  async fn find(&self, record: &T) -> Result<T> {
    self.network.find(record).await
  }

  async fn find_all(&self, record: &T) -> Result<Vec<T>> {
    self.network.find_all(record).await
  }

  async fn create(&self, record: &T) -> Result<T> {
    self.network.create(record).await
  }

  async fn create_all(&self, records: &[T]) -> Result<Vec<T>> {
    self.network.create_all(records).await
  }

  async fn update(&self, record: &T) -> Result<T> {
    self.network.update(record).await
  }

  async fn update_all(&self, records: &[T]) -> Result<Vec<T>> {
    self.network.update_all(records).await
  }

  async fn delete(&self, record: &T) -> Result<T> {
    self.network.delete(record).await
  }

  async fn delete_all(&self, records: &[T]) -> Result<Vec<T>> {
    self.network.delete_all(records).await
  }
}
