#![allow(dead_code)]

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{http::header, test, web, App, Error};
use serde_json::json;

use bookstore::auth::{AuthMiddleware, AuthResponse, PasswordHasher, TokenService};
use bookstore::config::JwtSettings;
use bookstore::routes::{self, health};
use bookstore::{seed, AppState};

pub const SEED_PASSWORD: &str = "P@ssword1";

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: "integration-test-secret".to_string(),
        issuer: "bookstore-api".to_string(),
        audience: "bookstore-clients".to_string(),
        lifetime_minutes: 5,
    }
}

/// In-memory state with the seed roles and users in place. bcrypt runs at its
/// minimum cost to keep the suite fast.
pub async fn seeded_state() -> AppState {
    let state = AppState::in_memory(TokenService::new(&jwt_settings()), PasswordHasher::new(4));
    seed_into(&state).await;
    state
}

pub async fn seed_into(state: &AppState) {
    seed::run(
        state.users.as_ref(),
        state.roles.as_ref(),
        &state.passwords,
        SEED_PASSWORD,
    )
    .await
    .expect("seeding the store");
}

pub async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    username: &str,
) -> AuthResponse {
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "username": username, "password": SEED_PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::OK,
        "login as {} failed",
        username
    );
    test::read_body_json(resp).await
}

pub async fn token_for(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    username: &str,
) -> String {
    login(app, username).await.token
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
