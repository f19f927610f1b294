pub mod admin_view_model;
pub mod browse_view_model;
pub mod home_view_model;
pub mod player_view_model;
pub mod property;

pub use admin_view_model::AdminViewModel;
pub use browse_view_model::BrowseViewModel;
pub use home_view_model::HomeViewModel;
pub use player_view_model::PlayerViewModel;
pub use property::{Property, PropertySubscriber};

use crate::events::EventBus;
use std::sync::Arc;

#[async_trait::async_trait]
pub trait ViewModel: Send + Sync {
    async fn initialize(&self, event_bus: Arc<EventBus>);

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber>;

    async fn refresh(&self);

    fn dispose(&self) {}
}
