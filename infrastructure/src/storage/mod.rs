//! Object and status store adapters

pub mod fs;
pub mod memory;
pub mod status;

pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use status::{DEFAULT_STATUS_TTL, InMemoryStatusStore};
