use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, LoginResponse, MessageResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::CreateUserError,
        repo_types::User,
    },
    error::ApiError,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(payload) = payload?;

    let (username, password) = match (payload.username, payload.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            warn!("register missing username or password");
            return Err(ApiError::Validation(
                "Username and password are required".into(),
            ));
        }
    };

    let hash = match hash_password(&password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err(ApiError::Internal);
        }
    };

    let user_id = match User::create(&state.db, &username, &hash).await {
        Ok(id) => id,
        Err(CreateUserError::DuplicateUsername) => {
            warn!(username = %username, "username already registered");
            return Err(ApiError::Conflict("Username already exists".into()));
        }
        Err(CreateUserError::Storage(e)) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::Internal);
        }
    };

    info!(user_id, username = %username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

#[instrument(skip(state, keys, payload))]
pub async fn login(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;

    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        warn!("login missing username or password");
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    };

    let user = match User::find_by_username(&state.db, &username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(username = %username, "login unknown username");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err(ApiError::Internal);
        }
    };

    if !verify_password(&password, &user.password_hash) {
        warn!(username = %username, user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let access_token = match keys.sign(&user.username) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "jwt sign failed");
            return Err(ApiError::Internal);
        }
    };

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        access_token,
    }))
}
