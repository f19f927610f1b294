use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which physical collection a content row came from. The two collections
/// share the same record shape; the tag is attached when rows are merged
/// into a single in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    TvShow,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::TvShow => "tv_show",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::TvShow => "TV Show",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie or TV show record. Identifiers are unique within a collection;
/// across the merged view they collide only if the two collections do,
/// which is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub video_url: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub rating: Option<f32>,
    /// Runtime in minutes.
    pub duration: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

impl ContentItem {
    /// Case-insensitive substring match over title, description and genre.
    /// An empty query passes everything.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || self
                .genre
                .as_ref()
                .is_some_and(|g| g.to_lowercase().contains(&needle))
    }

    /// Case-insensitive substring match against the genre field.
    /// `"all"` is the identity filter.
    pub fn matches_genre(&self, genre: &str) -> bool {
        if genre.eq_ignore_ascii_case("all") {
            return true;
        }
        self.genre
            .as_ref()
            .is_some_and(|g| g.to_lowercase().contains(&genre.to_lowercase()))
    }

    pub fn has_video(&self) -> bool {
        self.video_url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Human-readable runtime for cards and the watch view, e.g. "2h 15m".
    pub fn duration_label(&self) -> Option<String> {
        self.duration.map(crate::utils::format::runtime_label)
    }
}

/// Role claim supplied by the session collaborator. Admin access is an
/// explicit claim, never inferred from the email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone)]
pub enum Credentials {
    EmailPassword { email: String, password: String },
    Token { token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, description: Option<&str>, genre: Option<&str>) -> ContentItem {
        ContentItem {
            id: "movie_1".to_string(),
            content_type: ContentType::Movie,
            title: title.to_string(),
            description: description.map(str::to_string),
            poster_url: None,
            backdrop_url: None,
            video_url: None,
            year: Some(2005),
            genre: genre.map(str::to_string),
            rating: Some(8.2),
            duration: Some(140),
            created_at: Utc::now(),
            user_id: "user_1".to_string(),
        }
    }

    #[test]
    fn query_matches_title_description_and_genre() {
        let it = item("Batman Begins", Some("Bruce Wayne returns"), Some("action"));
        assert!(it.matches_query("batman"));
        assert!(it.matches_query("BRUCE"));
        assert!(it.matches_query("act"));
        assert!(!it.matches_query("comedy"));
    }

    #[test]
    fn empty_query_passes_everything() {
        let it = item("Inception", None, None);
        assert!(it.matches_query(""));
    }

    #[test]
    fn genre_all_is_identity() {
        let with_genre = item("A", None, Some("drama"));
        let without_genre = item("B", None, None);
        assert!(with_genre.matches_genre("all"));
        assert!(without_genre.matches_genre("all"));
        assert!(with_genre.matches_genre("Drama"));
        assert!(!without_genre.matches_genre("drama"));
    }

    #[test]
    fn admin_from_role_claim_not_email() {
        let user = User {
            id: "u1".to_string(),
            email: "admin@streamflix.example".to_string(),
            display_name: None,
            role: Role::Viewer,
        };
        assert!(!user.is_admin());
    }

    #[test]
    fn content_item_serializes_with_camel_case_tag() {
        let it = item("Heat", None, None);
        let json = serde_json::to_value(&it).unwrap();
        assert_eq!(json["type"], "movie");
        assert!(json.get("posterUrl").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
