pub mod event_bus;
pub mod types;

pub use event_bus::{EventBus, EventSubscriber};
pub use types::{AppEvent, EventPayload, EventType};
