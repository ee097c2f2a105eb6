//! Repository layer.
//!
//! Each entity is reached through an `async_trait` interface so the HTTP layer can
//! be handed either the Postgres store or the in-memory store. Write operations
//! return `Ok(false)` when the store reports that nothing was changed; callers treat
//! that exactly like an `Err`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Author, Book, NewAuthor, NewBook, NewUser, Role, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// CRUD operations shared by the catalogue entities.
///
/// `T` is the persisted entity, `N` the shape inserted before an id exists.
#[async_trait]
pub trait Repository<T, N>: Send + Sync
where
    T: Send + Sync + 'static,
    N: Send + 'static,
{
    async fn find_all(&self) -> Result<Vec<T>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<T>, AppError>;

    /// Inserts the entity and returns it with its store-assigned id.
    async fn create(&self, new: N) -> Result<T, AppError>;

    /// Persists every field of `entity`. `Ok(false)` when no row was updated.
    async fn update(&self, entity: &T) -> Result<bool, AppError>;

    /// `Ok(false)` when no row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    async fn exists(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait BookRepository: Repository<Book, NewBook> {
    async fn find_by_author(&self, author_id: i32) -> Result<Vec<Book>, AppError>;
}

#[async_trait]
pub trait AuthorRepository: Repository<Author, NewAuthor> {}

/// Account storage backing credential checks and seeding.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn create(&self, new: NewUser) -> Result<User, AppError>;

    /// Names of the roles assigned to the user.
    async fn roles_of(&self, user_id: i32) -> Result<Vec<String>, AppError>;

    /// `Ok(false)` when the membership already existed.
    async fn add_to_role(&self, user_id: i32, role_id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Role>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError>;

    async fn create(&self, name: &str) -> Result<Role, AppError>;
}
