mod common;

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use bookstore::error::INTERNAL_ERROR_MESSAGE;
use bookstore::models::BookDto;
use common::{bearer, init_app, seeded_state, token_for};

fn book_payload() -> Value {
    json!({
        "title": "The Left Hand of Darkness",
        "year": 1969,
        "isbn": "978-0441478125",
        "summary": "An envoy learns the customs of a world without fixed gender.",
        "image": "left-hand.jpg"
    })
}

#[actix_rt::test]
async fn test_book_crud_flow() {
    let app = init_app(seeded_state().await).await;
    let token = token_for(&app, "customer1").await;

    // 1. Create
    let req = test::TestRequest::post()
        .uri("/api/books")
        .append_header(bearer(&token))
        .set_json(book_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: BookDto = test::read_body_json(resp).await;
    assert_eq!(created.title, "The Left Hand of Darkness");
    assert_eq!(created.year, 1969);
    assert_eq!(created.image.as_deref(), Some("left-hand.jpg"));
    assert_eq!(created.author_id, None);

    // 2. Get by id returns the same fields
    let req = test::TestRequest::get()
        .uri(&format!("/api/books/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    let fetched: BookDto = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    // 3. List
    let req = test::TestRequest::get()
        .uri("/api/books")
        .append_header(bearer(&token))
        .to_request();
    let books: Vec<BookDto> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(books, vec![created.clone()]);

    // 4. Update
    let req = test::TestRequest::put()
        .uri(&format!("/api/books/{}", created.id))
        .append_header(bearer(&token))
        .set_json(json!({
            "id": created.id,
            "title": "The Dispossessed",
            "year": 1974,
            "isbn": "978-0061054884",
            "summary": "A physicist travels between two worlds."
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/books/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    let updated: BookDto = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "The Dispossessed");
    assert_eq!(updated.image, None);

    // 5. Delete, then Get is a 404
    let req = test::TestRequest::delete()
        .uri(&format!("/api/books/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/books/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_missing_books_are_not_found() {
    let app = init_app(seeded_state().await).await;
    let token = token_for(&app, "admin").await;

    for id in [1, 42, 9000] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/books/{}", id))
            .append_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let mut payload = book_payload();
        payload["id"] = json!(id);
        let req = test::TestRequest::put()
            .uri(&format!("/api/books/{}", id))
            .append_header(bearer(&token))
            .set_json(&payload)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/books/{}", id))
            .append_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_rt::test]
async fn test_invalid_book_inputs() {
    let app = init_app(seeded_state().await).await;
    let token = token_for(&app, "admin").await;

    let mut no_title = book_payload();
    no_title.as_object_mut().unwrap().remove("title");
    let mut short_summary = book_payload();
    short_summary["summary"] = json!("Short");
    let mut ancient = book_payload();
    ancient["year"] = json!(12);

    let test_cases = vec![
        (no_title, "missing title"),
        (short_summary, "summary too short"),
        (ancient, "year before 1000"),
        (json!(null), "null body"),
        (json!([]), "array body"),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/books")
            .append_header(bearer(&token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "Test case failed: {}", description);
        assert!(body["error"].is_string(), "Test case failed: {}", description);
    }

    let req = test::TestRequest::get()
        .uri("/api/books")
        .append_header(bearer(&token))
        .to_request();
    let books: Vec<BookDto> = test::call_and_read_body_json(&app, req).await;
    assert!(books.is_empty());
}

#[actix_rt::test]
async fn test_update_and_delete_reject_bad_ids() {
    let app = init_app(seeded_state().await).await;
    let token = token_for(&app, "admin").await;

    let req = test::TestRequest::post()
        .uri("/api/books")
        .append_header(bearer(&token))
        .set_json(book_payload())
        .to_request();
    let created: BookDto = test::call_and_read_body_json(&app, req).await;

    let mut mismatched = book_payload();
    mismatched["id"] = json!(created.id + 10);
    let req = test::TestRequest::put()
        .uri(&format!("/api/books/{}", created.id))
        .append_header(bearer(&token))
        .set_json(&mismatched)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    // Mismatch is rejected even when no book has the path id
    let mut absent = book_payload();
    absent["id"] = json!(1000);
    let req = test::TestRequest::put()
        .uri("/api/books/999")
        .append_header(bearer(&token))
        .set_json(&absent)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let mut zero = book_payload();
    zero["id"] = json!(0);
    let req = test::TestRequest::put()
        .uri("/api/books/0")
        .append_header(bearer(&token))
        .set_json(&zero)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/api/books/{}", created.id))
        .append_header(bearer(&token))
        .insert_header(ContentType::json())
        .set_payload("null")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri("/api/books/-3")
        .append_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/books/abc")
        .append_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_store_failure_is_a_generic_500() {
    let app = init_app(seeded_state().await).await;
    let token = token_for(&app, "admin").await;

    let mut payload = book_payload();
    payload["authorId"] = json!(12345);
    let req = test::TestRequest::post()
        .uri("/api/books")
        .append_header(bearer(&token))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": INTERNAL_ERROR_MESSAGE }));
}

#[actix_rt::test]
async fn test_books_require_a_token() {
    let app = init_app(seeded_state().await).await;

    let req = test::TestRequest::post()
        .uri("/api/books")
        .set_json(book_payload())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}
