//! Postgres store backed by a `sqlx` connection pool.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{AuthorRepository, BookRepository, Repository, RoleRepository, UserRepository};
use crate::error::AppError;
use crate::models::{Author, Book, NewAuthor, NewBook, NewUser, Role, User};

const BOOK_COLUMNS: &str = "id, title, year, isbn, summary, image, author_id";
const AUTHOR_COLUMNS: &str = "id, first_name, last_name, bio";
const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Repository<Book, NewBook> for PgStore {
    async fn find_all(&self) -> Result<Vec<Book>, AppError> {
        let sql = format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS);
        Ok(sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, AppError> {
        let sql = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, new: NewBook) -> Result<Book, AppError> {
        let sql = format!(
            "INSERT INTO books (title, year, isbn, summary, image, author_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            BOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(new.title)
            .bind(new.year)
            .bind(new.isbn)
            .bind(new.summary)
            .bind(new.image)
            .bind(new.author_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, entity: &Book) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE books
             SET title = $1, year = $2, isbn = $3, summary = $4, image = $5, author_id = $6
             WHERE id = $7",
        )
        .bind(&entity.title)
        .bind(entity.year)
        .bind(&entity.isbn)
        .bind(&entity.summary)
        .bind(&entity.image)
        .bind(entity.author_id)
        .bind(entity.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        Ok(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl BookRepository for PgStore {
    async fn find_by_author(&self, author_id: i32) -> Result<Vec<Book>, AppError> {
        let sql = format!(
            "SELECT {} FROM books WHERE author_id = $1 ORDER BY id",
            BOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl Repository<Author, NewAuthor> for PgStore {
    async fn find_all(&self) -> Result<Vec<Author>, AppError> {
        let sql = format!("SELECT {} FROM authors ORDER BY id", AUTHOR_COLUMNS);
        Ok(sqlx::query_as::<_, Author>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, AppError> {
        let sql = format!("SELECT {} FROM authors WHERE id = $1", AUTHOR_COLUMNS);
        Ok(sqlx::query_as::<_, Author>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, new: NewAuthor) -> Result<Author, AppError> {
        let sql = format!(
            "INSERT INTO authors (first_name, last_name, bio) VALUES ($1, $2, $3) RETURNING {}",
            AUTHOR_COLUMNS
        );
        Ok(sqlx::query_as::<_, Author>(&sql)
            .bind(new.first_name)
            .bind(new.last_name)
            .bind(new.bio)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, entity: &Author) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE authors SET first_name = $1, last_name = $2, bio = $3 WHERE id = $4",
        )
        .bind(&entity.first_name)
        .bind(&entity.last_name)
        .bind(&entity.bio)
        .bind(entity.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        Ok(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?,
        )
    }
}

impl AuthorRepository for PgStore {}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, new: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(new.username)
            .bind(new.email)
            .bind(new.password_hash)
            .bind(new.first_name)
            .bind(new.last_name)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn roles_of(&self, user_id: i32) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM roles r
             JOIN user_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = $1
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn add_to_role(&self, user_id: i32, role_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RoleRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<Role>, AppError> {
        Ok(
            sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        Ok(
            sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create(&self, name: &str) -> Result<Role, AppError> {
        Ok(
            sqlx::query_as::<_, Role>("INSERT INTO roles (name) VALUES ($1) RETURNING id, name")
                .bind(name)
                .fetch_one(&self.pool)
                .await?,
        )
    }
}
