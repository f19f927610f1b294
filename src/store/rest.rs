use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::traits::{Collection, ContentStore, ListQuery};
use crate::models::{ContentItem, ContentType};
use crate::utils::StoreError;

const CLIENT_NAME: &str = "StreamFlix";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the hosted document API backing the content store.
/// Records are schemaless key/value documents; this client speaks the
/// camelCase record shape and tags rows with their collection on read.
#[derive(Debug, Clone)]
pub struct RestContentStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
}

impl RestContentStore {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", CLIENT_NAME, CLIENT_VERSION))
            .build()?;

        let base_url = base_url.into();
        // Catch malformed endpoints at construction, not on first request.
        url::Url::parse(&base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key,
        })
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!(
            "{}/v1/projects/{}/collections/{}/records",
            self.base_url,
            self.project_id,
            collection.as_str()
        )
    }

    fn record_url(&self, collection: Collection, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, StoreError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::check(response).await
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            Err(StoreError::NotFound(body))
        } else {
            Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ContentStore for RestContentStore {
    async fn list(&self, collection: Collection, query: ListQuery) -> Result<Vec<ContentItem>> {
        let mut params: Vec<(&str, String)> =
            vec![("orderBy", query.order.as_order_param().to_string())];
        if let Some(id) = &query.id {
            params.push(("id", id.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        debug!("Listing {} with {:?}", collection, params);
        let request = self.client.get(self.collection_url(collection)).query(&params);
        let response = self.send(request).await?;
        let body: ListResponse = Self::decode(response).await?;

        Ok(body
            .records
            .into_iter()
            .map(|doc| doc.into_item(collection.content_type()))
            .collect())
    }

    async fn create(&self, collection: Collection, item: ContentItem) -> Result<ContentItem> {
        let doc = RecordDoc::from_item(&item);
        let request = self.client.post(self.collection_url(collection)).json(&doc);
        let response = self.send(request).await?;
        let created: RecordDoc = Self::decode(response).await?;
        Ok(created.into_item(collection.content_type()))
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        item: ContentItem,
    ) -> Result<ContentItem> {
        let doc = RecordDoc::from_item(&item);
        let request = self.client.put(self.record_url(collection, id)).json(&doc);
        let response = self.send(request).await?;
        let updated: RecordDoc = Self::decode(response).await?;
        Ok(updated.into_item(collection.content_type()))
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let request = self.client.delete(self.record_url(collection, id));
        self.send(request).await?;
        Ok(())
    }
}

/// Wire shape of a content record. The document API stores no type tag;
/// provenance comes from the collection the record was fetched from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordDoc {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backdrop_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    created_at: DateTime<Utc>,
    user_id: String,
}

impl RecordDoc {
    fn from_item(item: &ContentItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            poster_url: item.poster_url.clone(),
            backdrop_url: item.backdrop_url.clone(),
            video_url: item.video_url.clone(),
            year: item.year,
            genre: item.genre.clone(),
            rating: item.rating,
            duration: item.duration,
            created_at: item.created_at,
            user_id: item.user_id.clone(),
        }
    }

    fn into_item(self, content_type: ContentType) -> ContentItem {
        ContentItem {
            id: self.id,
            content_type,
            title: self.title,
            description: self.description,
            poster_url: self.poster_url,
            backdrop_url: self.backdrop_url,
            video_url: self.video_url,
            year: self.year,
            genre: self.genre,
            rating: self.rating,
            duration: self.duration,
            created_at: self.created_at,
            user_id: self.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    records: Vec<RecordDoc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::traits::SortKey;
    use mockito::Matcher;

    fn store(base_url: &str) -> RestContentStore {
        RestContentStore::new(
            base_url,
            "streamflix-test",
            Some("test-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn record_json(id: &str, title: &str) -> String {
        format!(
            r#"{{"id":"{}","title":"{}","createdAt":"2024-03-01T12:00:00Z","userId":"u1","rating":7.5}}"#,
            id, title
        )
    }

    #[tokio::test]
    async fn list_sends_ordering_hint_and_tags_rows() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/v1/projects/streamflix-test/collections/movies/records",
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("orderBy".into(), "rating:desc".into()),
                Matcher::UrlEncoded("limit".into(), "50".into()),
            ]))
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(format!(
                r#"{{"records":[{},{}]}}"#,
                record_json("m1", "Alien"),
                record_json("m2", "Heat")
            ))
            .create_async()
            .await;

        let rows = store(&server.url())
            .list(
                Collection::Movies,
                ListQuery::new().ordered_by(SortKey::Rating).with_limit(50),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].content_type, ContentType::Movie);
        assert_eq!(rows[0].title, "Alien");
    }

    #[tokio::test]
    async fn watch_probe_sends_id_filter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/v1/projects/streamflix-test/collections/tv_shows/records",
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), "t9".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"records":[]}"#)
            .create_async()
            .await;

        let rows = store(&server.url())
            .list(
                Collection::TvShows,
                ListQuery::new().with_id("t9").with_limit(1),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn server_error_surfaces_with_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                "/v1/projects/streamflix-test/collections/movies/records",
            )
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = store(&server.url())
            .list(Collection::Movies, ListQuery::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn delete_missing_record_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "DELETE",
                "/v1/projects/streamflix-test/collections/movies/records/m404",
            )
            .with_status(404)
            .create_async()
            .await;

        let err = store(&server.url())
            .delete(Collection::Movies, "m404")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_posts_record_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/v1/projects/streamflix-test/collections/movies/records",
            )
            .match_body(Matcher::PartialJsonString(
                r#"{"id":"movie_1","title":"Heat"}"#.to_string(),
            ))
            .with_status(201)
            .with_body(record_json("movie_1", "Heat"))
            .create_async()
            .await;

        let item = ContentItem {
            id: "movie_1".to_string(),
            content_type: ContentType::Movie,
            title: "Heat".to_string(),
            description: None,
            poster_url: None,
            backdrop_url: None,
            video_url: None,
            year: None,
            genre: None,
            rating: None,
            duration: None,
            created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
            user_id: "u1".to_string(),
        };

        let created = store(&server.url())
            .create(Collection::Movies, item)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(created.id, "movie_1");
    }
}
