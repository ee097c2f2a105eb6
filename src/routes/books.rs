use crate::{
    auth::{AuthenticatedUser, Permission},
    error::AppError,
    models::{BookDto, CreateBookDto, NewBook, UpdateBookDto},
    routes::{check_id, check_path_matches, parse_body},
    state::AppState,
};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Lists every book.
///
/// ## Responses:
/// - `200 OK`: JSON array of `BookDto`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: store failure.
#[get("")]
pub async fn get_books(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require(Permission::ListBooks)?;

    let books = state.books.find_all().await?;
    let dtos: Vec<BookDto> = books.into_iter().map(BookDto::from).collect();

    Ok(HttpResponse::Ok().json(dtos))
}

/// Retrieves a single book.
///
/// ## Responses:
/// - `200 OK`: the `BookDto`.
/// - `404 Not Found`: no book with that id.
#[get("/{id}")]
pub async fn get_book(
    state: web::Data<AppState>,
    book_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require(Permission::ViewBook)?;
    let id = book_id.into_inner();

    match state.books.find_by_id(id).await? {
        Some(book) => Ok(HttpResponse::Ok().json(BookDto::from(book))),
        None => {
            log::warn!("Book record not found in get_book: {}", id);
            Err(AppError::NotFound("Book not found".into()))
        }
    }
}

/// Creates a book.
///
/// ## Responses:
/// - `201 Created`: the new `BookDto`, with a `Location` header.
/// - `400 Bad Request`: undecodable body or failed field validation.
/// - `500 Internal Server Error`: store failure, including an unknown `authorId`.
#[post("")]
pub async fn create_book(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    user.require(Permission::CreateBook)?;
    let book_data: CreateBookDto = parse_body(&body)?;
    book_data.validate()?;

    let book = state
        .books
        .create(NewBook::from(book_data))
        .await?;
    log::info!("Created book {} by user {}", book.id, user.claims().uid);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/books/{}", book.id)))
        .json(BookDto::from(book)))
}

/// Replaces a book.
///
/// The embedded `id` of the payload must equal the path id.
///
/// ## Responses:
/// - `204 No Content`: updated.
/// - `400 Bad Request`: id below 1, id mismatch, or failed field validation.
/// - `404 Not Found`: no book with that id.
/// - `500 Internal Server Error`: the store failed or reported no update.
#[put("/{id}")]
pub async fn update_book(
    state: web::Data<AppState>,
    book_id: web::Path<i32>,
    user: AuthenticatedUser,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    user.require(Permission::UpdateBook)?;
    let id = book_id.into_inner();
    check_id(id)?;
    let book_data: UpdateBookDto = parse_body(&body)?;
    check_path_matches(id, book_data.id)?;

    if !state.books.exists(id).await? {
        log::warn!("Book record not found in update_book: {}", id);
        return Err(AppError::NotFound("Book not found".into()));
    }

    book_data.validate()?;

    let mut book = state
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".into()))?;
    book_data.apply_to(&mut book);

    if !state.books.update(&book).await? {
        return Err(AppError::InternalServerError(format!(
            "Store reported no update for book {}",
            id
        )));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Deletes a book.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `400 Bad Request`: id below 1.
/// - `404 Not Found`: no book with that id.
/// - `500 Internal Server Error`: the store failed or reported no deletion.
#[delete("/{id}")]
pub async fn delete_book(
    state: web::Data<AppState>,
    book_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require(Permission::DeleteBook)?;
    let id = book_id.into_inner();
    check_id(id)?;

    if !state.books.exists(id).await? {
        log::warn!("Book record not found in delete_book: {}", id);
        return Err(AppError::NotFound("Book not found".into()));
    }

    let book = state
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".into()))?;

    if !state.books.delete(book.id).await? {
        return Err(AppError::InternalServerError(format!(
            "Store reported no deletion for book {}",
            id
        )));
    }
    log::info!("Deleted book {} by user {}", id, user.claims().uid);

    Ok(HttpResponse::NoContent().finish())
}
