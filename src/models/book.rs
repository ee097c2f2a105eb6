use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A book as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: String,
    pub image: Option<String>,
    /// Identifier of the author who wrote the book, if known.
    pub author_id: Option<i32>,
}

/// The fields of a book that is about to be inserted. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: String,
    pub image: Option<String>,
    pub author_id: Option<i32>,
}

/// Payload for `POST /api/books`.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookDto {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(range(min = 1000))]
    pub year: i32,
    #[validate(length(min = 1, max = 50))]
    pub isbn: String,
    #[validate(length(min = 10, max = 250))]
    pub summary: String,
    #[validate(length(max = 250))]
    pub image: Option<String>,
    #[validate(range(min = 1))]
    pub author_id: Option<i32>,
}

/// Payload for `PUT /api/books/{id}`. The embedded `id` must equal the path id.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookDto {
    pub id: i32,
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(range(min = 1000))]
    pub year: i32,
    #[validate(length(min = 1, max = 50))]
    pub isbn: String,
    #[validate(length(min = 10, max = 250))]
    pub summary: String,
    #[validate(length(max = 250))]
    pub image: Option<String>,
    #[validate(range(min = 1))]
    pub author_id: Option<i32>,
}

/// A book as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: String,
    pub image: Option<String>,
    pub author_id: Option<i32>,
}

impl From<CreateBookDto> for NewBook {
    fn from(dto: CreateBookDto) -> Self {
        Self {
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image: dto.image,
            author_id: dto.author_id,
        }
    }
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            year: book.year,
            isbn: book.isbn,
            summary: book.summary,
            image: book.image,
            author_id: book.author_id,
        }
    }
}

impl UpdateBookDto {
    /// Overwrites the mutable fields of `book` with this payload. The id is left alone.
    pub fn apply_to(self, book: &mut Book) {
        book.title = self.title;
        book.year = self.year;
        book.isbn = self.isbn;
        book.summary = self.summary;
        book.image = self.image;
        book.author_id = self.author_id;
    }
}

impl NewBook {
    pub fn into_book(self, id: i32) -> Book {
        Book {
            id,
            title: self.title,
            year: self.year,
            isbn: self.isbn,
            summary: self.summary,
            image: self.image,
            author_id: self.author_id,
        }
    }
}
