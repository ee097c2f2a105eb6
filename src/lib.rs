#![doc = "The `bookstore` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, repositories, authentication and"]
#![doc = "authorization, routing configuration, seeding and error handling for the"]
#![doc = "bookstore API. It is used by the main binary (`main.rs`) to construct and run"]
#![doc = "the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod state;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
