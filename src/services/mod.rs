// Service exports
pub mod snapshot;
pub mod store;

pub use snapshot::{load_directory, load_match_snapshot, MatchSnapshot};
pub use store::{InMemoryStore, SeedData, SelectionStore, StoreError};
