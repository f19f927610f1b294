use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ContentItem, ContentType};

/// The two physical collections exposed by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Movies,
    TvShows,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Movies => "movies",
            Collection::TvShows => "tv_shows",
        }
    }

    /// The type tag attached to rows fetched from this collection.
    pub fn content_type(&self) -> ContentType {
        match self {
            Collection::Movies => ContentType::Movie,
            Collection::TvShows => ContentType::TvShow,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering hint forwarded to the store at fetch time. Sorting happens
/// store-side; the client never re-sorts, so filters preserve this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Title,
    Rating,
}

impl SortKey {
    /// Parse a user-facing sort selector. Unknown values fall back to
    /// `Newest`, matching the browse page's default.
    pub fn parse(value: &str) -> Self {
        match value {
            "oldest" => SortKey::Oldest,
            "title" => SortKey::Title,
            "rating" => SortKey::Rating,
            _ => SortKey::Newest,
        }
    }

    /// Wire value for the document API's `orderBy` parameter.
    pub fn as_order_param(&self) -> &'static str {
        match self {
            SortKey::Newest => "createdAt:desc",
            SortKey::Oldest => "createdAt:asc",
            SortKey::Title => "title:asc",
            SortKey::Rating => "rating:desc",
        }
    }
}

/// Parameters for a collection list call: an optional exact-id equality
/// filter, an ordering hint and a row cap.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub id: Option<String>,
    pub order: SortKey,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn ordered_by(mut self, order: SortKey) -> Self {
        self.order = order;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Document-style content store collaborator. Implementations must tag
/// every returned row with the collection's content type so callers can
/// merge result sets without losing provenance.
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug {
    async fn list(&self, collection: Collection, query: ListQuery) -> Result<Vec<ContentItem>>;

    async fn create(&self, collection: Collection, item: ContentItem) -> Result<ContentItem>;

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        item: ContentItem,
    ) -> Result<ContentItem>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}
