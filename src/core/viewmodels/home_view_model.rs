use super::{Property, PropertySubscriber, ViewModel};
use crate::events::{AppEvent, EventBus, EventType};
use crate::models::ContentItem;
use crate::services::ContentService;
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

/// State behind the landing view: a featured hero item and one row per
/// collection, newest first.
pub struct HomeViewModel {
    content_service: Arc<ContentService>,
    movies: Property<Vec<ContentItem>>,
    tv_shows: Property<Vec<ContentItem>>,
    featured: Property<Option<ContentItem>>,
    is_loading: Property<bool>,
    error: Property<Option<String>>,
}

impl HomeViewModel {
    pub fn new(content_service: Arc<ContentService>) -> Self {
        Self {
            content_service,
            movies: Property::new(Vec::new(), "movies"),
            tv_shows: Property::new(Vec::new(), "tv_shows"),
            featured: Property::new(None, "featured"),
            is_loading: Property::new(false, "is_loading"),
            error: Property::new(None, "error"),
        }
    }

    pub async fn load_content(&self) -> Result<()> {
        self.is_loading.set(true).await;
        self.error.set(None).await;

        match self.content_service.load_home().await {
            Ok(home) => {
                info!(
                    "Home loaded: {} movies, {} tv shows",
                    home.movies.len(),
                    home.tv_shows.len()
                );
                self.movies.set(home.movies).await;
                self.tv_shows.set(home.tv_shows).await;
                self.featured.set(home.featured).await;
            }
            Err(e) => {
                error!("Failed to load home content: {}", e);
                // A failed load shows an empty page with an error banner,
                // never stale rows.
                self.movies.set(Vec::new()).await;
                self.tv_shows.set(Vec::new()).await;
                self.featured.set(None).await;
                self.error
                    .set(Some("Failed to load content".to_string()))
                    .await;
            }
        }

        self.is_loading.set(false).await;
        Ok(())
    }

    async fn handle_event(&self, event: AppEvent) {
        match event.event_type {
            EventType::ContentCreated | EventType::ContentUpdated | EventType::ContentDeleted => {
                let _ = self.load_content().await;
            }
            _ => {}
        }
    }

    pub fn movies(&self) -> &Property<Vec<ContentItem>> {
        &self.movies
    }

    pub fn tv_shows(&self) -> &Property<Vec<ContentItem>> {
        &self.tv_shows
    }

    pub fn featured(&self) -> &Property<Option<ContentItem>> {
        &self.featured
    }

    pub fn is_loading(&self) -> &Property<bool> {
        &self.is_loading
    }

    pub fn error(&self) -> &Property<Option<String>> {
        &self.error
    }
}

#[async_trait::async_trait]
impl ViewModel for HomeViewModel {
    async fn initialize(&self, event_bus: Arc<EventBus>) {
        let mut subscriber = event_bus.subscribe_to_types(vec![
            EventType::ContentCreated,
            EventType::ContentUpdated,
            EventType::ContentDeleted,
        ]);
        let self_clone = self.clone();

        tokio::spawn(async move {
            while let Ok(event) = subscriber.recv().await {
                self_clone.handle_event(event).await;
            }
        });

        let _ = self.load_content().await;
    }

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "movies" => Some(self.movies.subscribe()),
            "tv_shows" => Some(self.tv_shows.subscribe()),
            "featured" => Some(self.featured.subscribe()),
            "is_loading" => Some(self.is_loading.subscribe()),
            "error" => Some(self.error.subscribe()),
            _ => None,
        }
    }

    async fn refresh(&self) {
        let _ = self.load_content().await;
    }
}

impl Clone for HomeViewModel {
    fn clone(&self) -> Self {
        Self {
            content_service: self.content_service.clone(),
            movies: self.movies.clone(),
            tv_shows: self.tv_shows.clone(),
            featured: self.featured.clone(),
            is_loading: self.is_loading.clone(),
            error: self.error.clone(),
        }
    }
}
