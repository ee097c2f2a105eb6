//! Diagnostic endpoints. Unauthenticated and backed by no store.

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::Value;

#[get("")]
pub async fn list_values() -> impl Responder {
    log::info!("Home: listing values");
    HttpResponse::Ok().json(["value1", "value2"])
}

#[get("/{id}")]
pub async fn get_value(id: web::Path<i32>) -> impl Responder {
    log::info!("Home: reading value {}", id);
    HttpResponse::Ok().json("value")
}

#[post("")]
pub async fn post_value(body: web::Bytes) -> impl Responder {
    log::info!("Home: received {} bytes", body.len());
    HttpResponse::Ok().finish()
}

#[put("/{id}")]
pub async fn put_value(id: web::Path<i32>, body: web::Bytes) -> impl Responder {
    let parsed = serde_json::from_slice::<Value>(&body).ok();
    log::info!("Home: replacing value {} with {:?}", id, parsed);
    HttpResponse::Ok().finish()
}

#[delete("/{id}")]
pub async fn delete_value(id: web::Path<i32>) -> impl Responder {
    log::info!("Home: deleting value {}", id);
    HttpResponse::Ok().finish()
}
