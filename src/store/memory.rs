use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::{Collection, ContentStore, ListQuery, SortKey};
use crate::models::ContentItem;

/// In-memory content store used by tests and offline demos. Applies the
/// same equality filter, ordering hint and row cap the hosted document
/// API applies server-side.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    collections: RwLock<HashMap<Collection, Vec<ContentItem>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection, tagging rows with the collection's content type.
    pub async fn seed(&self, collection: Collection, items: Vec<ContentItem>) {
        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection).or_default();
        for mut item in items {
            item.content_type = collection.content_type();
            rows.push(item);
        }
    }

    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }

    fn sort_rows(rows: &mut [ContentItem], order: SortKey) {
        match order {
            SortKey::Newest => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::Oldest => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortKey::Title => rows.sort_by(|a, b| a.title.cmp(&b.title)),
            SortKey::Rating => rows.sort_by(|a, b| {
                b.rating
                    .partial_cmp(&a.rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn list(&self, collection: Collection, query: ListQuery) -> Result<Vec<ContentItem>> {
        let collections = self.collections.read().await;
        let mut rows: Vec<ContentItem> = collections
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|r| query.id.as_ref().is_none_or(|id| &r.id == id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Self::sort_rows(&mut rows, query.order);

        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }

        for row in &mut rows {
            row.content_type = collection.content_type();
        }
        Ok(rows)
    }

    async fn create(&self, collection: Collection, mut item: ContentItem) -> Result<ContentItem> {
        item.content_type = collection.content_type();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .push(item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        mut item: ContentItem,
    ) -> Result<ContentItem> {
        item.content_type = collection.content_type();
        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection).or_default();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| anyhow!("Record not found: {}/{}", collection, id))?;
        *row = item.clone();
        Ok(item)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(anyhow!("Record not found: {}/{}", collection, id));
        }
        Ok(())
    }
}
