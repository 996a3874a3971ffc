//! Cache capability for record stores.
//!
//! The core only consumes caches through [`CacheManager`]; [`MemoryCache`] is
//! the in-process backend. Nothing here talks to the network, and no store
//! fills or invalidates a cache on its own.

mod memory;
mod traits;

pub use memory::MemoryCache;
pub use traits::CacheManager;
