use anyhow::Result;
use tokio::sync::broadcast;
use tracing::trace;

use super::types::{AppEvent, EventPayload, EventType};
use crate::models::ContentType;

/// Subscriber handle with an optional event-type filter.
pub struct EventSubscriber {
    receiver: broadcast::Receiver<AppEvent>,
    types: Option<Vec<EventType>>,
}

impl EventSubscriber {
    fn new(receiver: broadcast::Receiver<AppEvent>, types: Option<Vec<EventType>>) -> Self {
        Self { receiver, types }
    }

    /// Receive the next event matching the filter.
    pub async fn recv(&mut self) -> Result<AppEvent> {
        loop {
            let event = self.receiver.recv().await?;
            match &self.types {
                Some(types) if !types.contains(&event.event_type) => continue,
                _ => return Ok(event),
            }
        }
    }

    /// Try to receive without blocking.
    pub fn try_recv(&mut self) -> Option<AppEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => match &self.types {
                    Some(types) if !types.contains(&event.event_type) => continue,
                    _ => return Some(event),
                },
                Err(_) => return None,
            }
        }
    }
}

/// Broadcast bus connecting the admin CRUD flow, the session layer and
/// whatever view models are currently mounted.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: AppEvent) {
        trace!("Publishing event: {}", event.event_type.as_str());
        // No subscribers is normal; nothing to do about a send failure.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), None)
    }

    pub fn subscribe_to_types(&self, types: Vec<EventType>) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), Some(types))
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn emit_content_event(&self, event_type: EventType, id: String, content_type: ContentType) {
        self.publish(AppEvent::new(
            event_type,
            EventPayload::Content { id, content_type },
        ));
    }

    pub fn emit_user_signed_in(&self, user_id: String) {
        self.publish(AppEvent::new(
            EventType::UserSignedIn,
            EventPayload::User { user_id },
        ));
    }

    pub fn emit_user_signed_out(&self, user_id: String) {
        self.publish(AppEvent::new(
            EventType::UserSignedOut,
            EventPayload::User { user_id },
        ));
    }

    pub fn emit_playback(&self, event_type: EventType, content_id: String) {
        self.publish(AppEvent::new(
            event_type,
            EventPayload::Playback { content_id },
        ));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
