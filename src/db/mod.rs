pub mod match_queries;
pub mod match_store;
pub mod memory_store;

pub use match_queries::PgMatchStore;
pub use match_store::{MatchStore, StoreError};
pub use memory_store::InMemoryMatchStore;
