use anyhow::Result;
use futures::future;
use std::sync::Arc;
use tracing::debug;

use crate::constants::{BROWSE_PAGE_SIZE, HOME_PAGE_SIZE};
use crate::models::{ContentItem, ContentType};
use crate::store::{Collection, ContentStore, ListQuery, SortKey};

/// Which slice of the catalog a browse view shows. `Search` merges both
/// collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseSection {
    Movies,
    TvShows,
    Search,
}

impl BrowseSection {
    /// Parse the `:type` route segment.
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "movies" => Some(BrowseSection::Movies),
            "tv-shows" => Some(BrowseSection::TvShows),
            "search" => Some(BrowseSection::Search),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            BrowseSection::Movies => "Movies",
            BrowseSection::TvShows => "TV Shows",
            BrowseSection::Search => "Browse",
        }
    }
}

/// Content fetched for the home view. Featured is the first movie when
/// any exist, otherwise the first TV show.
#[derive(Debug, Clone, Default)]
pub struct HomeContent {
    pub movies: Vec<ContentItem>,
    pub tv_shows: Vec<ContentItem>,
    pub featured: Option<ContentItem>,
}

/// Per-view content loading over the injected store. Fetches fan out to
/// both collections concurrently and come back merged with their type
/// tags attached.
#[derive(Debug, Clone)]
pub struct ContentService {
    store: Arc<dyn ContentStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    fn collection_for(content_type: ContentType) -> Collection {
        match content_type {
            ContentType::Movie => Collection::Movies,
            ContentType::TvShow => Collection::TvShows,
        }
    }

    /// Fetch the home view: up to 20 most-recent rows from each
    /// collection, fetched concurrently.
    pub async fn load_home(&self) -> Result<HomeContent> {
        let recent = ListQuery::new()
            .ordered_by(SortKey::Newest)
            .with_limit(HOME_PAGE_SIZE);

        let (movies, tv_shows) = tokio::join!(
            self.store.list(Collection::Movies, recent.clone()),
            self.store.list(Collection::TvShows, recent),
        );
        let movies = movies?;
        let tv_shows = tv_shows?;

        let featured = movies.first().or_else(|| tv_shows.first()).cloned();
        debug!(
            "Home loaded: {} movies, {} tv shows",
            movies.len(),
            tv_shows.len()
        );

        Ok(HomeContent {
            movies,
            tv_shows,
            featured,
        })
    }

    /// Fetch a browse section with the given ordering hint, capped at 50
    /// rows per collection. Search merges both collections, movies first.
    pub async fn load_section(
        &self,
        section: BrowseSection,
        sort: SortKey,
    ) -> Result<Vec<ContentItem>> {
        let query = ListQuery::new().ordered_by(sort).with_limit(BROWSE_PAGE_SIZE);

        let items = match section {
            BrowseSection::Movies => self.store.list(Collection::Movies, query).await?,
            BrowseSection::TvShows => self.store.list(Collection::TvShows, query).await?,
            BrowseSection::Search => {
                let (movies, tv_shows) = tokio::join!(
                    self.store.list(Collection::Movies, query.clone()),
                    self.store.list(Collection::TvShows, query),
                );
                let mut merged = movies?;
                merged.extend(tv_shows?);
                merged
            }
        };

        debug!("Section {:?} loaded {} items", section, items.len());
        Ok(items)
    }

    /// Watch-view probe: exact-id match against movies first, then
    /// tv_shows. Both collections empty means "not found", not an error.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<ContentItem>> {
        let probe = ListQuery::new().with_id(id).with_limit(1);

        let movies = self.store.list(Collection::Movies, probe.clone()).await?;
        if let Some(found) = movies.into_iter().next() {
            return Ok(Some(found));
        }

        let tv_shows = self.store.list(Collection::TvShows, probe).await?;
        Ok(tv_shows.into_iter().next())
    }

    /// Full, uncapped tables for the admin dashboard, newest first.
    pub async fn load_catalog(&self) -> Result<(Vec<ContentItem>, Vec<ContentItem>)> {
        let newest = ListQuery::new().ordered_by(SortKey::Newest);

        future::try_join(
            self.store.list(Collection::Movies, newest.clone()),
            self.store.list(Collection::TvShows, newest),
        )
        .await
    }

    pub async fn create_item(&self, item: ContentItem) -> Result<ContentItem> {
        let collection = Self::collection_for(item.content_type);
        self.store.create(collection, item).await
    }

    pub async fn update_item(&self, item: ContentItem) -> Result<ContentItem> {
        let collection = Self::collection_for(item.content_type);
        let id = item.id.clone();
        self.store.update(collection, &id, item).await
    }

    pub async fn delete_item(&self, content_type: ContentType, id: &str) -> Result<()> {
        self.store
            .delete(Self::collection_for(content_type), id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryContentStore;
    use chrono::{Duration, Utc};

    fn item(id: &str, title: &str, age_days: i64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            content_type: ContentType::Movie,
            title: title.to_string(),
            description: None,
            poster_url: None,
            backdrop_url: None,
            video_url: None,
            year: Some(2020),
            genre: None,
            rating: Some(7.0),
            duration: Some(100),
            created_at: Utc::now() - Duration::days(age_days),
            user_id: "u1".to_string(),
        }
    }

    async fn service_with(
        movies: Vec<ContentItem>,
        tv_shows: Vec<ContentItem>,
    ) -> ContentService {
        let store = MemoryContentStore::new();
        store.seed(Collection::Movies, movies).await;
        store.seed(Collection::TvShows, tv_shows).await;
        ContentService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn home_features_first_movie_over_tv_shows() {
        let service = service_with(
            vec![item("m1", "Newest Movie", 0), item("m2", "Older Movie", 5)],
            vec![item("t1", "Newest Show", 0)],
        )
        .await;

        let home = service.load_home().await.unwrap();
        assert_eq!(home.featured.as_ref().unwrap().id, "m1");
        assert_eq!(home.movies.len(), 2);
        assert_eq!(home.tv_shows.len(), 1);
    }

    #[tokio::test]
    async fn home_falls_back_to_tv_show_when_no_movies() {
        let service = service_with(vec![], vec![item("t1", "Only Show", 0)]).await;
        let home = service.load_home().await.unwrap();
        assert_eq!(home.featured.as_ref().unwrap().id, "t1");
        assert_eq!(
            home.featured.as_ref().unwrap().content_type,
            ContentType::TvShow
        );
    }

    #[tokio::test]
    async fn home_with_empty_catalog_has_no_featured() {
        let service = service_with(vec![], vec![]).await;
        let home = service.load_home().await.unwrap();
        assert!(home.featured.is_none());
    }

    #[tokio::test]
    async fn search_merges_both_collections() {
        let service = service_with(
            vec![item("m1", "A", 0), item("m2", "B", 1)],
            vec![item("t1", "C", 0)],
        )
        .await;

        let merged = service
            .load_section(BrowseSection::Search, SortKey::Newest)
            .await
            .unwrap();
        // Merged length equals the sum of the two source collections.
        assert_eq!(merged.len(), 3);
        assert!(
            merged
                .iter()
                .take(2)
                .all(|i| i.content_type == ContentType::Movie)
        );
    }

    #[tokio::test]
    async fn typed_sections_fetch_one_collection() {
        let service = service_with(vec![item("m1", "A", 0)], vec![item("t1", "B", 0)]).await;

        let movies = service
            .load_section(BrowseSection::Movies, SortKey::Newest)
            .await
            .unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].content_type, ContentType::Movie);

        let shows = service
            .load_section(BrowseSection::TvShows, SortKey::Newest)
            .await
            .unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].content_type, ContentType::TvShow);
    }

    #[tokio::test]
    async fn watch_probe_checks_movies_then_tv_shows() {
        let service = service_with(vec![item("m1", "Movie", 0)], vec![item("t1", "Show", 0)]).await;

        let movie = service.find_by_id("m1").await.unwrap().unwrap();
        assert_eq!(movie.content_type, ContentType::Movie);

        let show = service.find_by_id("t1").await.unwrap().unwrap();
        assert_eq!(show.content_type, ContentType::TvShow);

        assert!(service.find_by_id("nope").await.unwrap().is_none());
    }

    #[test]
    fn browse_section_routes() {
        assert_eq!(BrowseSection::parse("movies"), Some(BrowseSection::Movies));
        assert_eq!(
            BrowseSection::parse("tv-shows"),
            Some(BrowseSection::TvShows)
        );
        assert_eq!(BrowseSection::parse("search"), Some(BrowseSection::Search));
        assert_eq!(BrowseSection::parse("music"), None);
    }
}
