#![forbid(unsafe_code)]

pub mod memory;
pub mod store;

pub use memory::InMemoryProgressStore;
pub use store::{ContextProvider, ProgressStore, StoreError};
