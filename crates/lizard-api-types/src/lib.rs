//! Request and response shapes of the post-listing endpoint (`GET /api/posts`).
//!
//! The JSON uses camelCase keys; timestamps travel as RFC 3339 strings and are
//! parsed by the consumer.

use serde::{Deserialize, Serialize};

/// Body of `GET /api/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsEnvelope {
    pub posts: Vec<PostDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: String,
    pub title: String,
    pub publish_date: String,
    pub author: AuthorDto,
    pub summary: String,
    #[serde(default)]
    pub categories: Vec<CategoryDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDto {
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
}

impl PostsEnvelope {
    /// Parse an envelope from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mock_api_payload() {
        let body = br#"{
            "posts": [{
                "id": "6a1f",
                "title": "Lizards at dawn",
                "publishDate": "2023-04-01T08:30:00.000Z",
                "author": { "name": "Ana", "avatar": "https://example.test/a.png" },
                "summary": "Basking habits.",
                "categories": [{ "id": "c1", "name": "Nature" }]
            }]
        }"#;

        let envelope = PostsEnvelope::from_slice(body).expect("valid envelope");
        assert_eq!(envelope.posts.len(), 1);
        let post = &envelope.posts[0];
        assert_eq!(post.publish_date, "2023-04-01T08:30:00.000Z");
        assert_eq!(post.categories[0].name, "Nature");
    }

    #[test]
    fn missing_categories_default_to_empty() {
        let body = br#"{"posts":[{"id":"1","title":"t","publishDate":"2023-01-01T00:00:00Z",
            "author":{"name":"n","avatar":"a"},"summary":"s"}]}"#;
        let envelope = PostsEnvelope::from_slice(body).expect("valid envelope");
        assert!(envelope.posts[0].categories.is_empty());
    }

    #[test]
    fn rejects_missing_posts_key() {
        assert!(PostsEnvelope::from_slice(br#"{"items":[]}"#).is_err());
    }
}
