pub mod memory;
pub mod mongo;
pub mod store;

pub use memory::MemoryProductStore;
pub use mongo::MongoProductStore;
pub use store::{ProductStore, StoreError, StoreOutcome};
