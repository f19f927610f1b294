use super::{Property, PropertySubscriber, ViewModel};
use crate::events::{EventBus, EventType};
use crate::models::{ContentItem, ContentType};
use crate::services::ContentService;
use anyhow::Result;
use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Form state for the admin editor. Numeric fields stay text until
/// submit so partially-typed input never fails validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDraft {
    pub content_type: ContentType,
    pub title: String,
    pub description: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub video_url: String,
    pub year: String,
    pub genre: String,
    pub rating: String,
    pub duration: String,
}

impl ContentDraft {
    pub fn empty(content_type: ContentType) -> Self {
        Self {
            content_type,
            title: String::new(),
            description: String::new(),
            poster_url: String::new(),
            backdrop_url: String::new(),
            video_url: String::new(),
            year: String::new(),
            genre: String::new(),
            rating: String::new(),
            duration: String::new(),
        }
    }

    pub fn from_item(item: &ContentItem) -> Self {
        Self {
            content_type: item.content_type,
            title: item.title.clone(),
            description: item.description.clone().unwrap_or_default(),
            poster_url: item.poster_url.clone().unwrap_or_default(),
            backdrop_url: item.backdrop_url.clone().unwrap_or_default(),
            video_url: item.video_url.clone().unwrap_or_default(),
            year: item.year.map(|y| y.to_string()).unwrap_or_default(),
            genre: item.genre.clone().unwrap_or_default(),
            rating: item.rating.map(|r| r.to_string()).unwrap_or_default(),
            duration: item.duration.map(|d| d.to_string()).unwrap_or_default(),
        }
    }

    fn optional(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Unparseable numbers fall back instead of blocking the save: the
    /// current year for `year`, zero for rating and duration.
    fn into_item(self, id: String, created_at: chrono::DateTime<Utc>, user_id: String) -> ContentItem {
        ContentItem {
            id,
            content_type: self.content_type,
            title: self.title.trim().to_string(),
            description: Self::optional(&self.description),
            poster_url: Self::optional(&self.poster_url),
            backdrop_url: Self::optional(&self.backdrop_url),
            video_url: Self::optional(&self.video_url),
            year: Some(self.year.trim().parse().unwrap_or_else(|_| Utc::now().year())),
            genre: Self::optional(&self.genre),
            rating: Some(self.rating.trim().parse().unwrap_or(0.0)),
            duration: Some(self.duration.trim().parse().unwrap_or(0)),
            created_at,
            user_id,
        }
    }
}

/// Item counts shown on the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminStats {
    pub movies: usize,
    pub tv_shows: usize,
}

impl AdminStats {
    pub fn total(&self) -> usize {
        self.movies + self.tv_shows
    }
}

/// Item pending deletion, held until the user confirms or cancels.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelete {
    pub content_type: ContentType,
    pub id: String,
    pub title: String,
}

/// State behind the admin dashboard: both catalog tables, the editor
/// form, and a two-phase delete. Every successful write re-fetches the
/// full catalog from the store.
pub struct AdminViewModel {
    content_service: Arc<ContentService>,
    user_id: String,
    movies: Property<Vec<ContentItem>>,
    tv_shows: Property<Vec<ContentItem>>,
    stats: Property<AdminStats>,
    draft: Property<ContentDraft>,
    editing: Property<Option<ContentItem>>,
    pending_delete: Property<Option<PendingDelete>>,
    is_loading: Property<bool>,
    is_saving: Property<bool>,
    notification: Property<Option<String>>,
    error: Property<Option<String>>,
    event_bus: Arc<EventBus>,
}

impl AdminViewModel {
    pub fn new(
        content_service: Arc<ContentService>,
        event_bus: Arc<EventBus>,
        user_id: String,
    ) -> Self {
        Self {
            content_service,
            user_id,
            movies: Property::new(Vec::new(), "movies"),
            tv_shows: Property::new(Vec::new(), "tv_shows"),
            stats: Property::new(AdminStats::default(), "stats"),
            draft: Property::new(ContentDraft::empty(ContentType::Movie), "draft"),
            editing: Property::new(None, "editing"),
            pending_delete: Property::new(None, "pending_delete"),
            is_loading: Property::new(false, "is_loading"),
            is_saving: Property::new(false, "is_saving"),
            notification: Property::new(None, "notification"),
            error: Property::new(None, "error"),
            event_bus,
        }
    }

    pub async fn load_catalog(&self) -> Result<()> {
        self.is_loading.set(true).await;
        self.error.set(None).await;

        match self.content_service.load_catalog().await {
            Ok((movies, tv_shows)) => {
                self.stats
                    .set(AdminStats {
                        movies: movies.len(),
                        tv_shows: tv_shows.len(),
                    })
                    .await;
                self.movies.set(movies).await;
                self.tv_shows.set(tv_shows).await;
            }
            Err(e) => {
                error!("Failed to load admin catalog: {}", e);
                self.error
                    .set(Some("Failed to load content".to_string()))
                    .await;
            }
        }

        self.is_loading.set(false).await;
        Ok(())
    }

    pub async fn set_draft(&self, draft: ContentDraft) {
        self.draft.set(draft).await;
    }

    /// Open the editor for an existing item; the draft is pre-filled and
    /// the original row is kept for id and creation timestamp.
    pub async fn begin_edit(&self, item: ContentItem) {
        self.draft.set(ContentDraft::from_item(&item)).await;
        self.editing.set(Some(item)).await;
    }

    pub async fn cancel_edit(&self) {
        self.editing.set(None).await;
        self.draft.set(ContentDraft::empty(ContentType::Movie)).await;
    }

    /// Save the current draft. A blank title rejects the submit before
    /// any store call; new rows get a `{type}_{millis}` id, edits keep
    /// their id and creation timestamp.
    pub async fn submit(&self) -> Result<()> {
        let draft = self.draft.get().await;
        if draft.title.trim().is_empty() {
            warn!("Rejected submit with empty title");
            self.notification
                .set(Some("Title is required".to_string()))
                .await;
            return Ok(());
        }

        self.is_saving.set(true).await;
        self.error.set(None).await;

        let editing = self.editing.get().await;
        let result = match editing {
            Some(original) => {
                let item = draft.into_item(
                    original.id.clone(),
                    original.created_at,
                    original.user_id.clone(),
                );
                let content_type = item.content_type;
                match self.content_service.update_item(item).await {
                    Ok(saved) => {
                        info!("Updated {} '{}'", content_type.as_str(), saved.title);
                        self.event_bus.emit_content_event(
                            EventType::ContentUpdated,
                            saved.id.clone(),
                            content_type,
                        );
                        Ok("Content updated".to_string())
                    }
                    Err(e) => Err(e),
                }
            }
            None => {
                let id = format!(
                    "{}_{}",
                    draft.content_type.as_str(),
                    Utc::now().timestamp_millis()
                );
                let item = draft.into_item(id, Utc::now(), self.user_id.clone());
                let content_type = item.content_type;
                match self.content_service.create_item(item).await {
                    Ok(saved) => {
                        info!("Created {} '{}'", content_type.as_str(), saved.title);
                        self.event_bus.emit_content_event(
                            EventType::ContentCreated,
                            saved.id.clone(),
                            content_type,
                        );
                        Ok("Content created".to_string())
                    }
                    Err(e) => Err(e),
                }
            }
        };

        match result {
            Ok(message) => {
                self.notification.set(Some(message)).await;
                self.editing.set(None).await;
                self.draft.set(ContentDraft::empty(ContentType::Movie)).await;
                let _ = self.load_catalog().await;
            }
            Err(e) => {
                error!("Failed to save content: {}", e);
                self.error
                    .set(Some("Failed to save content".to_string()))
                    .await;
            }
        }

        self.is_saving.set(false).await;
        Ok(())
    }

    /// First phase of deletion: remember the target and wait for an
    /// explicit confirmation.
    pub async fn request_delete(&self, item: &ContentItem) {
        self.pending_delete
            .set(Some(PendingDelete {
                content_type: item.content_type,
                id: item.id.clone(),
                title: item.title.clone(),
            }))
            .await;
    }

    pub async fn cancel_delete(&self) {
        self.pending_delete.set(None).await;
    }

    /// Second phase: actually delete, then re-fetch the catalog. A
    /// confirm without a pending target is a no-op.
    pub async fn confirm_delete(&self) -> Result<()> {
        let Some(pending) = self.pending_delete.get().await else {
            return Ok(());
        };
        self.pending_delete.set(None).await;

        match self
            .content_service
            .delete_item(pending.content_type, &pending.id)
            .await
        {
            Ok(()) => {
                info!("Deleted {} '{}'", pending.content_type.as_str(), pending.title);
                self.event_bus.emit_content_event(
                    EventType::ContentDeleted,
                    pending.id,
                    pending.content_type,
                );
                self.notification
                    .set(Some("Content deleted".to_string()))
                    .await;
                let _ = self.load_catalog().await;
            }
            Err(e) => {
                error!("Failed to delete content: {}", e);
                self.error
                    .set(Some("Failed to delete content".to_string()))
                    .await;
            }
        }

        Ok(())
    }

    pub async fn dismiss_notification(&self) {
        self.notification.set(None).await;
    }

    /// Genre choices offered by the editor form.
    pub fn genre_options(&self) -> &'static [&'static str] {
        crate::constants::GENRE_OPTIONS
    }

    pub fn movies(&self) -> &Property<Vec<ContentItem>> {
        &self.movies
    }

    pub fn tv_shows(&self) -> &Property<Vec<ContentItem>> {
        &self.tv_shows
    }

    pub fn stats(&self) -> &Property<AdminStats> {
        &self.stats
    }

    pub fn draft(&self) -> &Property<ContentDraft> {
        &self.draft
    }

    pub fn editing(&self) -> &Property<Option<ContentItem>> {
        &self.editing
    }

    pub fn pending_delete(&self) -> &Property<Option<PendingDelete>> {
        &self.pending_delete
    }

    pub fn is_loading(&self) -> &Property<bool> {
        &self.is_loading
    }

    pub fn is_saving(&self) -> &Property<bool> {
        &self.is_saving
    }

    pub fn notification(&self) -> &Property<Option<String>> {
        &self.notification
    }

    pub fn error(&self) -> &Property<Option<String>> {
        &self.error
    }
}

#[async_trait::async_trait]
impl ViewModel for AdminViewModel {
    async fn initialize(&self, _event_bus: Arc<EventBus>) {
        let _ = self.load_catalog().await;
    }

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "movies" => Some(self.movies.subscribe()),
            "tv_shows" => Some(self.tv_shows.subscribe()),
            "stats" => Some(self.stats.subscribe()),
            "draft" => Some(self.draft.subscribe()),
            "editing" => Some(self.editing.subscribe()),
            "pending_delete" => Some(self.pending_delete.subscribe()),
            "is_loading" => Some(self.is_loading.subscribe()),
            "is_saving" => Some(self.is_saving.subscribe()),
            "notification" => Some(self.notification.subscribe()),
            "error" => Some(self.error.subscribe()),
            _ => None,
        }
    }

    async fn refresh(&self) {
        let _ = self.load_catalog().await;
    }
}

impl Clone for AdminViewModel {
    fn clone(&self) -> Self {
        Self {
            content_service: self.content_service.clone(),
            user_id: self.user_id.clone(),
            movies: self.movies.clone(),
            tv_shows: self.tv_shows.clone(),
            stats: self.stats.clone(),
            draft: self.draft.clone(),
            editing: self.editing.clone(),
            pending_delete: self.pending_delete.clone(),
            is_loading: self.is_loading.clone(),
            is_saving: self.is_saving.clone(),
            notification: self.notification.clone(),
            error: self.error.clone(),
            event_bus: self.event_bus.clone(),
        }
    }
}
