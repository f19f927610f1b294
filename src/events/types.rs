use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ContentType;

/// An application event broadcast to mounted view models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEvent {
    pub id: String,
    pub event_type: EventType,
    pub payload: EventPayload,
    pub timestamp: DateTime<Utc>,
}

impl AppEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            payload,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    // Content events, published by the admin CRUD flow
    ContentCreated,
    ContentUpdated,
    ContentDeleted,

    // Session events
    UserSignedIn,
    UserSignedOut,

    // Playback events
    PlaybackStarted,
    PlaybackPaused,
}

impl EventType {
    /// String form used for routing and log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ContentCreated => "content.created",
            EventType::ContentUpdated => "content.updated",
            EventType::ContentDeleted => "content.deleted",
            EventType::UserSignedIn => "user.signed_in",
            EventType::UserSignedOut => "user.signed_out",
            EventType::PlaybackStarted => "playback.started",
            EventType::PlaybackPaused => "playback.paused",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Content {
        id: String,
        content_type: ContentType,
    },
    User {
        user_id: String,
    },
    Playback {
        content_id: String,
    },
    None,
}
