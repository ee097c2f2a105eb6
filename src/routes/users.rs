use crate::{
    auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    models::{NewUser, CUSTOMER},
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Login user
///
/// Verifies the username and password and returns a signed token carrying the user's
/// roles. A failed login never echoes the submitted credentials.
#[post("")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = authenticate(&state, &login_data).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Alias of `POST /api/users`.
#[post("/login")]
pub async fn login_alias(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = authenticate(&state, &login_data).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn authenticate(state: &AppState, login_data: &LoginRequest) -> Result<AuthResponse, AppError> {
    login_data.validate()?;

    let user = match state.users.find_by_username(&login_data.username).await? {
        Some(user) => user,
        None => {
            log::warn!("Login failed: unknown user {}", login_data.username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    if !state
        .passwords
        .verify(&login_data.password, &user.password_hash)?
    {
        log::warn!("Login failed: wrong password for {}", login_data.username);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let roles = state.users.roles_of(user.id).await?;
    let issued = state.tokens.issue(&user, roles)?;
    log::info!("User {} logged in", user.username);

    Ok(AuthResponse {
        token: issued.token,
        user_id: user.id,
        email: user.email,
        expires_at: issued.expires_at,
    })
}

/// Register a new customer account
///
/// Creates the account with the Customer role and returns an authentication token.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    if state
        .users
        .find_by_username(&register_data.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username already taken".into()));
    }
    if state
        .users
        .find_by_email(&register_data.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let role = state.roles.find_by_name(CUSTOMER).await?.ok_or_else(|| {
        AppError::InternalServerError(format!("Role {} has not been seeded", CUSTOMER))
    })?;

    let register_data = register_data.into_inner();
    let password_hash = state.passwords.hash(&register_data.password)?;
    let user = state
        .users
        .create(NewUser {
            username: register_data.username,
            email: register_data.email,
            password_hash,
            first_name: register_data.first_name,
            last_name: register_data.last_name,
        })
        .await
        .map_err(|err| match err {
            // Lost a race with a concurrent registration of the same name or email.
            AppError::BadRequest(_) => {
                AppError::BadRequest("Username or email already registered".into())
            }
            other => other,
        })?;

    if !state.users.add_to_role(user.id, role.id).await? {
        return Err(AppError::InternalServerError(format!(
            "Failed to add user {} to role {}",
            user.id, CUSTOMER
        )));
    }
    log::info!("Registered user {}", user.username);

    let issued = state.tokens.issue(&user, vec![role.name])?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token: issued.token,
        user_id: user.id,
        email: user.email,
        expires_at: issued.expires_at,
    }))
}
