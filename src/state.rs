//! Shared application state handed to every handler through `web::Data<AppState>`.

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::Config;
use crate::error::AppError;
use crate::repository::{
    AuthorRepository, BookRepository, MemoryStore, PgStore, RoleRepository, UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub books: Arc<dyn BookRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(
        books: Arc<dyn BookRepository>,
        authors: Arc<dyn AuthorRepository>,
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        tokens: TokenService,
        passwords: PasswordHasher,
    ) -> Self {
        Self {
            books,
            authors,
            users,
            roles,
            tokens: Arc::new(tokens),
            passwords,
        }
    }

    /// State whose repositories all share one in-memory store.
    pub fn in_memory(tokens: TokenService, passwords: PasswordHasher) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            tokens,
            passwords,
        )
    }

    /// Builds the state described by `config`: Postgres when a database URL is set,
    /// the in-memory store otherwise.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let tokens = TokenService::new(&config.jwt);
        let passwords = PasswordHasher::new(config.bcrypt_cost);

        match &config.database_url {
            Some(url) => {
                let store = Arc::new(PgStore::connect(url).await?);
                log::info!("Connected to Postgres store");
                Ok(Self::new(
                    store.clone(),
                    store.clone(),
                    store.clone(),
                    store,
                    tokens,
                    passwords,
                ))
            }
            None => {
                log::warn!("DATABASE_URL is not set; data is kept in memory and lost on exit");
                Ok(Self::in_memory(tokens, passwords))
            }
        }
    }
}
