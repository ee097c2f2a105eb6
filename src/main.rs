use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use bookstore::auth::AuthMiddleware;
use bookstore::routes::{self, health};
use bookstore::{seed, AppState, Config};

fn startup_error<E: std::fmt::Display>(context: &str, error: E) -> io::Error {
    log::error!("{}: {}", context, error);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    let state = AppState::from_config(&config)
        .await
        .map_err(|e| startup_error("Failed to initialise the store", e))?;

    if config.seed_on_startup {
        let report = seed::run(
            state.users.as_ref(),
            state.roles.as_ref(),
            &state.passwords,
            &config.seed_password,
        )
        .await
        .map_err(|e| startup_error("Seeding failed", e))?;
        log::info!(
            "Seeding complete: {} roles and {} users created",
            report.roles_created.len(),
            report.users_created.len()
        );
    }

    let data = web::Data::new(state);

    log::info!("Starting bookstore server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
