//! Typed record store over a REST resource API.
//!
//! A [`Store`] combines a [`NetworkManager`] (request building, sending and
//! response validation against one resource collection) with a
//! [`CacheManager`] (local peek/remove by record identity). Records implement
//! [`StoreRecord`].

pub mod cache;
pub mod config;
pub mod error;
pub mod network;
pub mod record;
pub mod store;

pub use cache::{CacheManager, MemoryCache};
pub use error::{Result, StoreError};
pub use network::{HttpNetworkManager, NetworkManager, NetworkOperation, Options};
pub use record::{JsonRecord, RecordId, StoreRecord};
pub use store::{Store, StoreManager};
