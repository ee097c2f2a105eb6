pub mod author;
pub mod book;
pub mod user;

pub use author::{Author, AuthorDto, CreateAuthorDto, NewAuthor, UpdateAuthorDto};
pub use book::{Book, BookDto, CreateBookDto, NewBook, UpdateBookDto};
pub use user::{NewUser, Role, User, ADMINISTRATOR, CUSTOMER};
