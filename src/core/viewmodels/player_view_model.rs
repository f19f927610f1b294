use super::{Property, PropertySubscriber, ViewModel};
use crate::events::{EventBus, EventType};
use crate::models::ContentItem;
use crate::services::ContentService;
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

/// Lifecycle of the watch view. `NotFound` is terminal; only a fresh
/// `load` leaves it.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchViewState {
    Loading,
    NotFound,
    Ready(ContentItem),
}

/// Transport state as a single tagged value. An item without a video
/// source never leaves `Unavailable`, so play/pause cannot be toggled
/// into a contradictory combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Unavailable,
    Paused,
    Playing,
}

pub struct PlayerViewModel {
    content_service: Arc<ContentService>,
    state: Property<WatchViewState>,
    transport: Property<Transport>,
    muted: Property<bool>,
    volume: Property<u8>,
    progress: Property<u8>,
    controls_visible: Property<bool>,
    error: Property<Option<String>>,
    event_bus: Arc<EventBus>,
}

impl PlayerViewModel {
    pub fn new(content_service: Arc<ContentService>, event_bus: Arc<EventBus>) -> Self {
        Self {
            content_service,
            state: Property::new(WatchViewState::Loading, "state"),
            transport: Property::new(Transport::Unavailable, "transport"),
            muted: Property::new(false, "muted"),
            volume: Property::new(100, "volume"),
            progress: Property::new(0, "progress"),
            controls_visible: Property::new(true, "controls_visible"),
            error: Property::new(None, "error"),
            event_bus,
        }
    }

    /// Resolve an id to a playable item. Absence and lookup failure both
    /// land in `NotFound`; failure additionally raises the error banner.
    pub async fn load(&self, id: &str) -> Result<()> {
        self.state.set(WatchViewState::Loading).await;
        self.error.set(None).await;
        self.progress.set(0).await;

        match self.content_service.find_by_id(id).await {
            Ok(Some(item)) => {
                let transport = if item.has_video() {
                    Transport::Paused
                } else {
                    Transport::Unavailable
                };
                info!("Watch view ready for '{}' ({:?})", item.title, transport);
                self.transport.set(transport).await;
                self.state.set(WatchViewState::Ready(item)).await;
            }
            Ok(None) => {
                info!("No content found for id {}", id);
                self.transport.set(Transport::Unavailable).await;
                self.state.set(WatchViewState::NotFound).await;
            }
            Err(e) => {
                error!("Content lookup failed for id {}: {}", id, e);
                self.transport.set(Transport::Unavailable).await;
                self.state.set(WatchViewState::NotFound).await;
                self.error
                    .set(Some("Failed to load content".to_string()))
                    .await;
            }
        }

        Ok(())
    }

    /// Flip between playing and paused. `Unavailable` absorbs the toggle.
    pub async fn toggle_play(&self) {
        let next = match self.transport.get().await {
            Transport::Unavailable => return,
            Transport::Paused => Transport::Playing,
            Transport::Playing => Transport::Paused,
        };
        self.transport.set(next).await;

        if let WatchViewState::Ready(item) = self.state.get().await {
            let event_type = match next {
                Transport::Playing => EventType::PlaybackStarted,
                _ => EventType::PlaybackPaused,
            };
            self.event_bus.emit_playback(event_type, item.id);
        }
    }

    pub async fn toggle_mute(&self) {
        self.muted.update(|muted| *muted = !*muted).await;
    }

    /// Volume is 0-100. Dragging to zero mutes; any audible level
    /// unmutes.
    pub async fn set_volume(&self, volume: u8) {
        let volume = volume.min(100);
        self.volume.set(volume).await;
        self.muted.set(volume == 0).await;
    }

    pub async fn set_progress(&self, percent: u8) {
        self.progress.set(percent.min(100)).await;
    }

    /// Elapsed/total readout next to the progress bar, e.g. "0:34 / 2:16".
    /// None until the view is ready or when the item has no runtime.
    pub async fn time_readout(&self) -> Option<String> {
        let WatchViewState::Ready(item) = self.state.get().await else {
            return None;
        };
        let total = item.duration?;
        let elapsed = total * u32::from(self.progress.get().await) / 100;
        Some(format!(
            "{} / {}",
            crate::utils::format::track_clock(elapsed),
            crate::utils::format::track_clock(total)
        ))
    }

    pub async fn pointer_moved(&self) {
        self.controls_visible.set(true).await;
    }

    pub async fn pointer_left(&self) {
        self.controls_visible.set(false).await;
    }

    pub fn state(&self) -> &Property<WatchViewState> {
        &self.state
    }

    pub fn transport(&self) -> &Property<Transport> {
        &self.transport
    }

    pub fn muted(&self) -> &Property<bool> {
        &self.muted
    }

    pub fn volume(&self) -> &Property<u8> {
        &self.volume
    }

    pub fn progress(&self) -> &Property<u8> {
        &self.progress
    }

    pub fn controls_visible(&self) -> &Property<bool> {
        &self.controls_visible
    }

    pub fn error(&self) -> &Property<Option<String>> {
        &self.error
    }
}

#[async_trait::async_trait]
impl ViewModel for PlayerViewModel {
    async fn initialize(&self, _event_bus: Arc<EventBus>) {}

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "state" => Some(self.state.subscribe()),
            "transport" => Some(self.transport.subscribe()),
            "muted" => Some(self.muted.subscribe()),
            "volume" => Some(self.volume.subscribe()),
            "progress" => Some(self.progress.subscribe()),
            "controls_visible" => Some(self.controls_visible.subscribe()),
            "error" => Some(self.error.subscribe()),
            _ => None,
        }
    }

    async fn refresh(&self) {
        if let WatchViewState::Ready(item) = self.state.get().await {
            let _ = self.load(&item.id).await;
        }
    }
}

impl Clone for PlayerViewModel {
    fn clone(&self) -> Self {
        Self {
            content_service: self.content_service.clone(),
            state: self.state.clone(),
            transport: self.transport.clone(),
            muted: self.muted.clone(),
            volume: self.volume.clone(),
            progress: self.progress.clone(),
            controls_visible: self.controls_visible.clone(),
            error: self.error.clone(),
            event_bus: self.event_bus.clone(),
        }
    }
}
