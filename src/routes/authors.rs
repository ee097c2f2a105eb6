use crate::{
    auth::{AuthenticatedUser, Permission},
    error::AppError,
    models::{AuthorDto, BookDto, CreateAuthorDto, NewAuthor, UpdateAuthorDto},
    routes::{check_id, check_path_matches, parse_body},
    state::AppState,
};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Lists every author.
#[get("")]
pub async fn get_authors(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require(Permission::ListAuthors)?;

    let authors = state.authors.find_all().await?;
    let dtos: Vec<AuthorDto> = authors.into_iter().map(AuthorDto::from).collect();

    Ok(HttpResponse::Ok().json(dtos))
}

#[get("/{id}")]
pub async fn get_author(
    state: web::Data<AppState>,
    author_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require(Permission::ViewAuthor)?;
    let id = author_id.into_inner();

    match state.authors.find_by_id(id).await? {
        Some(author) => Ok(HttpResponse::Ok().json(AuthorDto::from(author))),
        None => {
            log::warn!("Author record not found in get_author: {}", id);
            Err(AppError::NotFound("Author not found".into()))
        }
    }
}

/// Lists the books written by an author.
///
/// ## Responses:
/// - `200 OK`: JSON array of `BookDto`, possibly empty.
/// - `404 Not Found`: no author with that id.
#[get("/{id}/books")]
pub async fn get_author_books(
    state: web::Data<AppState>,
    author_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require(Permission::ViewAuthor)?;
    let id = author_id.into_inner();

    if !state.authors.exists(id).await? {
        log::warn!("Author record not found in get_author_books: {}", id);
        return Err(AppError::NotFound("Author not found".into()));
    }

    let books = state.books.find_by_author(id).await?;
    let dtos: Vec<BookDto> = books.into_iter().map(BookDto::from).collect();

    Ok(HttpResponse::Ok().json(dtos))
}

/// Creates an author. Administrators only.
///
/// ## Responses:
/// - `201 Created`: the new `AuthorDto`, with a `Location` header.
/// - `400 Bad Request`: undecodable body or failed field validation.
/// - `403 Forbidden`: caller lacks the Administrator role.
#[post("")]
pub async fn create_author(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    user.require(Permission::CreateAuthor)?;
    let author_data: CreateAuthorDto = parse_body(&body)?;
    author_data.validate()?;

    let author = state
        .authors
        .create(NewAuthor::from(author_data))
        .await?;
    log::info!("Created author {} by user {}", author.id, user.claims().uid);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/authors/{}", author.id)))
        .json(AuthorDto::from(author)))
}

/// Replaces an author. Administrators and customers.
///
/// ## Responses:
/// - `204 No Content`: updated.
/// - `400 Bad Request`: id below 1, id mismatch, or failed field validation.
/// - `404 Not Found`: no author with that id.
#[put("/{id}")]
pub async fn update_author(
    state: web::Data<AppState>,
    author_id: web::Path<i32>,
    user: AuthenticatedUser,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    user.require(Permission::UpdateAuthor)?;
    let id = author_id.into_inner();
    check_id(id)?;
    let author_data: UpdateAuthorDto = parse_body(&body)?;
    check_path_matches(id, author_data.id)?;

    if !state.authors.exists(id).await? {
        log::warn!("Author record not found in update_author: {}", id);
        return Err(AppError::NotFound("Author not found".into()));
    }

    author_data.validate()?;

    let mut author = state
        .authors
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".into()))?;
    author_data.apply_to(&mut author);

    if !state.authors.update(&author).await? {
        return Err(AppError::InternalServerError(format!(
            "Store reported no update for author {}",
            id
        )));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Deletes an author. Books written by the author are kept and lose their author.
#[delete("/{id}")]
pub async fn delete_author(
    state: web::Data<AppState>,
    author_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require(Permission::DeleteAuthor)?;
    let id = author_id.into_inner();
    check_id(id)?;

    if !state.authors.exists(id).await? {
        log::warn!("Author record not found in delete_author: {}", id);
        return Err(AppError::NotFound("Author not found".into()));
    }

    let author = state
        .authors
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".into()))?;

    if !state.authors.delete(author.id).await? {
        return Err(AppError::InternalServerError(format!(
            "Store reported no deletion for author {}",
            id
        )));
    }
    log::info!("Deleted author {} by user {}", id, user.claims().uid);

    Ok(HttpResponse::NoContent().finish())
}
