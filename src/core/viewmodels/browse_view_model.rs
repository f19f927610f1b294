use super::{Property, PropertySubscriber, ViewModel};
use crate::events::{AppEvent, EventBus, EventType};
use crate::models::ContentItem;
use crate::services::{BrowseSection, ContentService};
use crate::store::SortKey;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error};

/// State behind the catalog browsing view. The sort key is an ordering
/// hint sent to the store on fetch; the text and genre filters run
/// client-side over the fetched page and never re-order it.
pub struct BrowseViewModel {
    content_service: Arc<ContentService>,
    section: Property<BrowseSection>,
    sort: Property<SortKey>,
    query: Property<String>,
    genre: Property<String>,
    items: Property<Vec<ContentItem>>,
    filtered_items: Property<Vec<ContentItem>>,
    is_loading: Property<bool>,
    error: Property<Option<String>>,
}

impl BrowseViewModel {
    pub fn new(content_service: Arc<ContentService>, section: BrowseSection) -> Self {
        Self {
            content_service,
            section: Property::new(section, "section"),
            sort: Property::new(SortKey::default(), "sort"),
            query: Property::new(String::new(), "query"),
            genre: Property::new("all".to_string(), "genre"),
            items: Property::new(Vec::new(), "items"),
            filtered_items: Property::new(Vec::new(), "filtered_items"),
            is_loading: Property::new(false, "is_loading"),
            error: Property::new(None, "error"),
        }
    }

    /// Fetch the current section with the current ordering hint, then
    /// re-run the client-side filters over the fresh page.
    pub async fn load_items(&self) -> Result<()> {
        self.is_loading.set(true).await;
        self.error.set(None).await;

        let section = self.section.get().await;
        let sort = self.sort.get().await;

        match self.content_service.load_section(section, sort).await {
            Ok(items) => {
                debug!("Browse fetched {} items for {:?}", items.len(), section);
                self.items.set(items).await;
                self.apply_filters().await;
            }
            Err(e) => {
                error!("Failed to load browse items: {}", e);
                self.items.set(Vec::new()).await;
                self.filtered_items.set(Vec::new()).await;
                self.error
                    .set(Some("Failed to load content".to_string()))
                    .await;
            }
        }

        self.is_loading.set(false).await;
        Ok(())
    }

    /// Text filter first, genre filter second. Both are order-preserving,
    /// so the store's ordering survives any filter combination.
    async fn apply_filters(&self) {
        let query = self.query.get().await;
        let genre = self.genre.get().await;

        let filtered: Vec<ContentItem> = self
            .items
            .get()
            .await
            .into_iter()
            .filter(|item| item.matches_query(&query))
            .filter(|item| item.matches_genre(&genre))
            .collect();

        self.filtered_items.set(filtered).await;
    }

    pub async fn set_section(&self, section: BrowseSection) -> Result<()> {
        self.section.set(section).await;
        self.load_items().await
    }

    /// Changing the sort re-fetches; ordering lives store-side.
    pub async fn set_sort(&self, sort: SortKey) -> Result<()> {
        self.sort.set(sort).await;
        self.load_items().await
    }

    pub async fn set_query(&self, query: String) {
        self.query.set(query).await;
        self.apply_filters().await;
    }

    pub async fn set_genre(&self, genre: String) {
        self.genre.set(genre).await;
        self.apply_filters().await;
    }

    /// Values offered by the genre selector.
    pub fn genre_filters(&self) -> &'static [&'static str] {
        crate::constants::GENRE_FILTERS
    }

    async fn handle_event(&self, event: AppEvent) {
        match event.event_type {
            EventType::ContentCreated | EventType::ContentUpdated | EventType::ContentDeleted => {
                let _ = self.load_items().await;
            }
            _ => {}
        }
    }

    pub fn section(&self) -> &Property<BrowseSection> {
        &self.section
    }

    pub fn sort(&self) -> &Property<SortKey> {
        &self.sort
    }

    pub fn query(&self) -> &Property<String> {
        &self.query
    }

    pub fn genre(&self) -> &Property<String> {
        &self.genre
    }

    pub fn items(&self) -> &Property<Vec<ContentItem>> {
        &self.items
    }

    pub fn filtered_items(&self) -> &Property<Vec<ContentItem>> {
        &self.filtered_items
    }

    pub fn is_loading(&self) -> &Property<bool> {
        &self.is_loading
    }

    pub fn error(&self) -> &Property<Option<String>> {
        &self.error
    }
}

#[async_trait::async_trait]
impl ViewModel for BrowseViewModel {
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

        let _ = self.load_items().await;
    }

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "section" => Some(self.section.subscribe()),
            "sort" => Some(self.sort.subscribe()),
            "query" => Some(self.query.subscribe()),
            "genre" => Some(self.genre.subscribe()),
            "items" => Some(self.items.subscribe()),
            "filtered_items" => Some(self.filtered_items.subscribe()),
            "is_loading" => Some(self.is_loading.subscribe()),
            "error" => Some(self.error.subscribe()),
            _ => None,
        }
    }

    async fn refresh(&self) {
        let _ = self.load_items().await;
    }
}

impl Clone for BrowseViewModel {
    fn clone(&self) -> Self {
        Self {
            content_service: self.content_service.clone(),
            section: self.section.clone(),
            sort: self.sort.clone(),
            query: self.query.clone(),
            genre: self.genre.clone(),
            items: self.items.clone(),
            filtered_items: self.filtered_items.clone(),
            is_loading: self.is_loading.clone(),
            error: self.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use crate::store::{Collection, MemoryContentStore};
    use chrono::{Duration, Utc};

    fn item(id: &str, title: &str, genre: &str, rating: f32, age_days: i64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            content_type: ContentType::Movie,
            title: title.to_string(),
            description: Some(format!("{title} description")),
            poster_url: None,
            backdrop_url: None,
            video_url: None,
            year: Some(2020),
            genre: Some(genre.to_string()),
            rating: Some(rating),
            duration: Some(100),
            created_at: Utc::now() - Duration::days(age_days),
            user_id: "u1".to_string(),
        }
    }

    async fn vm_with_movies(movies: Vec<ContentItem>) -> BrowseViewModel {
        let store = MemoryContentStore::new();
        store.seed(Collection::Movies, movies).await;
        BrowseViewModel::new(
            Arc::new(ContentService::new(Arc::new(store))),
            BrowseSection::Movies,
        )
    }

    #[tokio::test]
    async fn text_filter_matches_title_description_and_genre() {
        let vm = vm_with_movies(vec![
            item("m1", "Batman Begins", "action", 8.2, 0),
            item("m2", "Quiet Drama", "drama", 7.0, 1),
        ])
        .await;
        vm.load_items().await.unwrap();

        vm.set_query("batman".to_string()).await;
        let filtered = vm.filtered_items().get().await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "m1");

        // Genre text also matches the free-text query.
        vm.set_query("drama".to_string()).await;
        assert_eq!(vm.filtered_items().get().await[0].id, "m2");
    }

    #[tokio::test]
    async fn genre_all_is_identity() {
        let vm = vm_with_movies(vec![
            item("m1", "A", "action", 8.0, 0),
            item("m2", "B", "drama", 7.0, 1),
        ])
        .await;
        vm.load_items().await.unwrap();

        vm.set_genre("all".to_string()).await;
        assert_eq!(vm.filtered_items().get().await.len(), 2);

        vm.set_genre("drama".to_string()).await;
        let filtered = vm.filtered_items().get().await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "m2");
    }

    #[tokio::test]
    async fn filters_preserve_store_ordering() {
        let vm = vm_with_movies(vec![
            item("m1", "Alpha", "action", 6.0, 3),
            item("m2", "Beta", "action", 9.0, 2),
            item("m3", "Gamma", "drama", 8.0, 1),
            item("m4", "Delta", "action", 7.5, 0),
        ])
        .await;

        vm.set_sort(SortKey::Rating).await.unwrap();
        vm.set_genre("action".to_string()).await;

        let filtered = vm.filtered_items().get().await;
        let ids: Vec<&str> = filtered.iter().map(|i| i.id.as_str()).collect();
        // Rating order from the store survives the genre filter untouched.
        assert_eq!(ids, vec!["m2", "m4", "m1"]);
    }

    #[tokio::test]
    async fn reapplying_same_filter_is_idempotent() {
        let vm = vm_with_movies(vec![
            item("m1", "Batman Begins", "action", 8.2, 0),
            item("m2", "Other", "drama", 7.0, 1),
        ])
        .await;
        vm.load_items().await.unwrap();

        vm.set_query("batman".to_string()).await;
        let first = vm.filtered_items().get().await;
        vm.set_query("batman".to_string()).await;
        let second = vm.filtered_items().get().await;

        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);
    }

    #[tokio::test]
    async fn search_section_merges_collections() {
        let store = MemoryContentStore::new();
        store
            .seed(Collection::Movies, vec![item("m1", "A", "action", 8.0, 0)])
            .await;
        let mut show = item("t1", "B", "drama", 7.0, 0);
        show.content_type = ContentType::TvShow;
        store.seed(Collection::TvShows, vec![show]).await;

        let vm = BrowseViewModel::new(
            Arc::new(ContentService::new(Arc::new(store))),
            BrowseSection::Search,
        );
        vm.load_items().await.unwrap();

        // Merged page length equals the sum of both collections.
        assert_eq!(vm.items().get().await.len(), 2);
    }
}
