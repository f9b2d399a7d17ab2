//! Domain entities built from the post-listing wire types.

use lizard_api_types::{AuthorDto, CategoryDto, PostDto};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub published_at: OffsetDateTime,
    pub author: AuthorRecord,
    pub categories: Vec<CategoryRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRecord {
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
}

impl PostRecord {
    /// Iterate over the category display names in the post's own order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }
}

impl TryFrom<PostDto> for PostRecord {
    type Error = DomainError;

    fn try_from(dto: PostDto) -> Result<Self, Self::Error> {
        let PostDto {
            id,
            title,
            publish_date,
            author,
            summary,
            categories,
        } = dto;

        let published_at = OffsetDateTime::parse(publish_date.trim(), &Rfc3339).map_err(|err| {
            DomainError::validation(format!(
                "post `{id}` has an invalid publishDate `{publish_date}`: {err}"
            ))
        })?;

        Ok(Self {
            id,
            title,
            summary,
            published_at,
            author: author.into(),
            categories: categories.into_iter().map(CategoryRecord::from).collect(),
        })
    }
}

impl From<AuthorDto> for AuthorRecord {
    fn from(dto: AuthorDto) -> Self {
        Self {
            name: dto.name,
            avatar: dto.avatar,
        }
    }
}

impl From<CategoryDto> for CategoryRecord {
    fn from(dto: CategoryDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}
