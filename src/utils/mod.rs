pub mod errors;
pub mod format;

pub use errors::StoreError;
