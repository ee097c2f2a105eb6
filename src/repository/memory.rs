//! In-memory store.
//!
//! Used when no `DATABASE_URL` is configured and by the test suite. It mirrors the
//! constraints of the relational schema in `migrations/`: a book may only reference an
//! existing author, deleting an author clears that reference on its books, and role
//! names, usernames and emails are unique. A uniqueness failure is reported as
//! `AppError::BadRequest`, the same as a Postgres unique violation.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthorRepository, BookRepository, Repository, RoleRepository, UserRepository};
use crate::error::AppError;
use crate::models::{Author, Book, NewAuthor, NewBook, NewUser, Role, User};

#[derive(Default)]
struct Tables {
    books: BTreeMap<i32, Book>,
    authors: BTreeMap<i32, Author>,
    users: BTreeMap<i32, User>,
    roles: BTreeMap<i32, Role>,
    user_roles: BTreeSet<(i32, i32)>,
    last_book_id: i32,
    last_author_id: i32,
    last_user_id: i32,
    last_role_id: i32,
}

impl Tables {
    fn check_author_reference(&self, author_id: Option<i32>) -> Result<(), AppError> {
        match author_id {
            Some(id) if !self.authors.contains_key(&id) => Err(AppError::DatabaseError(format!(
                "foreign key violation: author {} does not exist",
                id
            ))),
            _ => Ok(()),
        }
    }
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Book, NewBook> for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Book>, AppError> {
        Ok(self.tables.read().await.books.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, AppError> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn create(&self, new: NewBook) -> Result<Book, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_author_reference(new.author_id)?;
        let id = next_id(&mut tables.last_book_id);
        let book = new.into_book(id);
        tables.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update(&self, entity: &Book) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_author_reference(entity.author_id)?;
        match tables.books.get_mut(&entity.id) {
            Some(book) => {
                *book = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.write().await.books.remove(&id).is_some())
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.read().await.books.contains_key(&id))
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn find_by_author(&self, author_id: i32) -> Result<Vec<Book>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .books
            .values()
            .filter(|book| book.author_id == Some(author_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Repository<Author, NewAuthor> for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Author>, AppError> {
        Ok(self.tables.read().await.authors.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, AppError> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn create(&self, new: NewAuthor) -> Result<Author, AppError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.last_author_id);
        let author = new.into_author(id);
        tables.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn update(&self, entity: &Author) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables.authors.get_mut(&entity.id) {
            Some(author) => {
                *author = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.authors.remove(&id).is_none() {
            return Ok(false);
        }
        // ON DELETE SET NULL
        for book in tables.books.values_mut() {
            if book.author_id == Some(id) {
                book.author_id = None;
            }
        }
        Ok(true)
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.read().await.authors.contains_key(&id))
    }
}

impl AuthorRepository for MemoryStore {}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .users
            .values()
            .any(|user| user.username == new.username || user.email == new.email);
        if duplicate {
            log::warn!("Unique violation: user {} already exists", new.username);
            return Err(AppError::BadRequest("Record already exists".into()));
        }
        let id = next_id(&mut tables.last_user_id);
        let user = new.into_user(id);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn roles_of(&self, user_id: i32) -> Result<Vec<String>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_roles
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, role)| tables.roles.get(role))
            .map(|role| role.name.clone())
            .collect())
    }

    async fn add_to_role(&self, user_id: i32, role_id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) || !tables.roles.contains_key(&role_id) {
            return Err(AppError::DatabaseError(format!(
                "foreign key violation: user {} or role {} does not exist",
                user_id, role_id
            )));
        }
        Ok(tables.user_roles.insert((user_id, role_id)))
    }
}

#[async_trait]
impl RoleRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Role>, AppError> {
        Ok(self.tables.read().await.roles.values().cloned().collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .roles
            .values()
            .find(|role| role.name == name)
            .cloned())
    }

    async fn create(&self, name: &str) -> Result<Role, AppError> {
        let mut tables = self.tables.write().await;
        if tables.roles.values().any(|role| role.name == name) {
            log::warn!("Unique violation: role {} already exists", name);
            return Err(AppError::BadRequest("Record already exists".into()));
        }
        let id = next_id(&mut tables.last_role_id);
        let role = Role {
            id,
            name: name.to_string(),
        };
        tables.roles.insert(id, role.clone());
        Ok(role)
    }
}
