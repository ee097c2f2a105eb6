use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An author as stored in the database. One author has many books.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Payload for `POST /api/authors`.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorDto {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(length(max = 250))]
    pub bio: Option<String>,
}

/// Payload for `PUT /api/authors/{id}`. The embedded `id` must equal the path id.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorDto {
    pub id: i32,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(length(max = 250))]
    pub bio: Option<String>,
}

/// An author as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

impl From<CreateAuthorDto> for NewAuthor {
    fn from(dto: CreateAuthorDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            bio: dto.bio,
        }
    }
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            bio: author.bio,
        }
    }
}

impl UpdateAuthorDto {
    pub fn apply_to(self, author: &mut Author) {
        author.first_name = self.first_name;
        author.last_name = self.last_name;
        author.bio = self.bio;
    }
}

impl NewAuthor {
    pub fn into_author(self, id: i32) -> Author {
        Author {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
        }
    }
}
