mod interface;
mod json_store;
mod memory;

pub use interface::{BackendError, BankStore};
pub use json_store::JsonStore;
pub use memory::MemoryStore;
