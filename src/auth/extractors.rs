use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::policy::{self, Permission};
use crate::auth::Claims;
use crate::error::AppError;

/// The caller's verified token claims.
///
/// `AuthMiddleware` validates the bearer token and stores the claims in request
/// extensions; this extractor hands them to the handler. A missing entry means the
/// middleware did not run for this route and yields `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    /// Checks the policy table for `permission`.
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        policy::authorize(&self.0, permission)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedUser(claims))),
            None => {
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
