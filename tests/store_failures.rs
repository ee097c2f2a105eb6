mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use bookstore::auth::{PasswordHasher, TokenService};
use bookstore::error::INTERNAL_ERROR_MESSAGE;
use bookstore::models::{Author, Book, NewAuthor, NewBook, NewUser, User};
use bookstore::repository::{
    AuthorRepository, BookRepository, MemoryStore, Repository, UserRepository,
};
use bookstore::{AppError, AppState};
use common::{bearer, init_app, jwt_settings, seed_into, token_for};

/// Finds every record but reports each write as having changed nothing.
struct UnchangedBooks;

fn stored_book(id: i32) -> Book {
    Book {
        id,
        title: "Solaris".to_string(),
        year: 1961,
        isbn: "978-0156027601".to_string(),
        summary: "A scientist studies a living ocean.".to_string(),
        image: None,
        author_id: None,
    }
}

#[async_trait]
impl Repository<Book, NewBook> for UnchangedBooks {
    async fn find_all(&self) -> Result<Vec<Book>, AppError> {
        Ok(vec![stored_book(1)])
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, AppError> {
        Ok(Some(stored_book(id)))
    }

    async fn create(&self, new: NewBook) -> Result<Book, AppError> {
        Ok(new.into_book(1))
    }

    async fn update(&self, _entity: &Book) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn delete(&self, _id: i32) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn exists(&self, _id: i32) -> Result<bool, AppError> {
        Ok(true)
    }
}

#[async_trait]
impl BookRepository for UnchangedBooks {
    async fn find_by_author(&self, _author_id: i32) -> Result<Vec<Book>, AppError> {
        Ok(vec![])
    }
}

struct UnchangedAuthors;

#[async_trait]
impl Repository<Author, NewAuthor> for UnchangedAuthors {
    async fn find_all(&self) -> Result<Vec<Author>, AppError> {
        Ok(vec![])
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, AppError> {
        Ok(Some(NewAuthor {
            first_name: "Stanislaw".to_string(),
            last_name: "Lem".to_string(),
            bio: None,
        }
        .into_author(id)))
    }

    async fn create(&self, new: NewAuthor) -> Result<Author, AppError> {
        Ok(new.into_author(1))
    }

    async fn update(&self, _entity: &Author) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn delete(&self, _id: i32) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn exists(&self, _id: i32) -> Result<bool, AppError> {
        Ok(true)
    }
}

impl AuthorRepository for UnchangedAuthors {}

/// Lookups miss as if a concurrent registration had not landed yet; inserts still
/// hit the real store and its unique constraints.
struct LateLookupUsers(Arc<MemoryStore>);

#[async_trait]
impl UserRepository for LateLookupUsers {
    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        UserRepository::find_all(self.0.as_ref()).await
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, AppError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AppError> {
        Ok(None)
    }

    async fn create(&self, new: NewUser) -> Result<User, AppError> {
        UserRepository::create(self.0.as_ref(), new).await
    }

    async fn roles_of(&self, user_id: i32) -> Result<Vec<String>, AppError> {
        self.0.roles_of(user_id).await
    }

    async fn add_to_role(&self, user_id: i32, role_id: i32) -> Result<bool, AppError> {
        self.0.add_to_role(user_id, role_id).await
    }
}

async fn unchanged_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        Arc::new(UnchangedBooks),
        Arc::new(UnchangedAuthors),
        store.clone(),
        store,
        TokenService::new(&jwt_settings()),
        PasswordHasher::new(4),
    );
    seed_into(&state).await;
    state
}

#[actix_rt::test]
async fn test_unchanged_writes_are_a_generic_500() {
    let app = init_app(unchanged_state().await).await;
    let token = token_for(&app, "customer1").await;

    let cases = vec![
        (
            test::TestRequest::put().uri("/api/books/3").set_json(json!({
                "id": 3,
                "title": "Solaris",
                "year": 1961,
                "isbn": "978-0156027601",
                "summary": "A scientist studies a living ocean."
            })),
            "book update",
        ),
        (test::TestRequest::delete().uri("/api/books/3"), "book delete"),
        (
            test::TestRequest::put().uri("/api/authors/5").set_json(json!({
                "id": 5,
                "firstName": "Stanislaw",
                "lastName": "Lem"
            })),
            "author update",
        ),
        (test::TestRequest::delete().uri("/api/authors/5"), "author delete"),
    ];

    for (builder, description) in cases {
        let req = builder.append_header(bearer(&token)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Test case failed: {}",
            description
        );

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({ "error": INTERNAL_ERROR_MESSAGE }),
            "Test case failed: {}",
            description
        );
    }
}

#[actix_rt::test]
async fn test_register_race_is_a_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let seeded = AppState::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        TokenService::new(&jwt_settings()),
        PasswordHasher::new(4),
    );
    seed_into(&seeded).await;

    let state = AppState {
        users: Arc::new(LateLookupUsers(store)),
        ..seeded
    };
    let app = init_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "username": "customer1",
            "email": "late@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Username or email already registered");
}
