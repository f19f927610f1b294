pub mod memory;
pub mod rest;
pub mod traits;

pub use memory::MemoryContentStore;
pub use rest::RestContentStore;
pub use traits::{Collection, ContentStore, ListQuery, SortKey};
