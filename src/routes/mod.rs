pub mod authors;
pub mod books;
pub mod health;
pub mod home;
pub mod users;

use actix_web::web;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Registers every `/api` resource. Mount inside `web::scope("/api")`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(
            web::scope("/books")
                .service(books::get_books)
                .service(books::create_book)
                .service(books::get_book)
                .service(books::update_book)
                .service(books::delete_book),
        )
        .service(
            web::scope("/authors")
                .service(authors::get_authors)
                .service(authors::create_author)
                .service(authors::get_author)
                .service(authors::get_author_books)
                .service(authors::update_author)
                .service(authors::delete_author),
        )
        .service(
            web::scope("/users")
                .service(users::login)
                .service(users::login_alias)
                .service(users::register),
        )
        .service(
            web::scope("/home")
                .service(home::list_values)
                .service(home::get_value)
                .service(home::post_value)
                .service(home::put_value)
                .service(home::delete_value),
        );
}

/// Undecodable or `null` JSON bodies on `web::Json` extractors become a 400 with a
/// JSON error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid request body: {}", err)).into())
}

/// Non-integer path ids become a 400 instead of the default 404.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid path parameter: {}", err)).into())
}

/// Decodes a JSON request body. Handlers call this after the policy check, so a
/// caller without the required role learns nothing about the payload shape.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::BadRequest(format!("Invalid request body: {}", err)))
}

/// Ids in paths start at 1.
pub(crate) fn check_id(id: i32) -> Result<(), AppError> {
    if id < 1 {
        return Err(AppError::BadRequest(format!("Invalid id: {}", id)));
    }
    Ok(())
}

/// The id embedded in an update payload must match the id in the path.
pub(crate) fn check_path_matches(path_id: i32, body_id: i32) -> Result<(), AppError> {
    if path_id != body_id {
        return Err(AppError::BadRequest(format!(
            "Body id {} does not match path id {}",
            body_id, path_id
        )));
    }
    Ok(())
}
