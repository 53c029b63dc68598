// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheStats, CachedStore};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::{MarketplaceStore, StoreError};
