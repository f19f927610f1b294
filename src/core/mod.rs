pub mod viewmodels;

pub use viewmodels::{Property, PropertySubscriber, ViewModel};
