use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use tracing::info;

use travelblog_types::api::{LoginRequest, LoginResponse, RegisterRequest, StatusMessage};

use crate::error::{ApiError, require};
use crate::{AppState, with_db};

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    require("username", &req.username)?;
    require("password", &req.password)?;

    let username = req.username.clone();
    with_db(&state, move |db| {
        // Hash password with Argon2id
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .to_string();

        db.create_user(&req.username, &password_hash)?
            .ok_or(ApiError::UsernameTaken)
    })
    .await?;

    info!("Registered user {}", username);

    Ok((
        StatusCode::CREATED,
        Json(StatusMessage::new("User registered successfully")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    require("username", &req.username)?;
    require("password", &req.password)?;

    let user = with_db(&state, move |db| {
        let user = db
            .get_user_by_username(&req.username)?
            .ok_or(ApiError::UserNotFound)?;

        let parsed_hash =
            PasswordHash::new(&user.password).map_err(|e| ApiError::Internal(e.to_string()))?;

        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| ApiError::InvalidPassword)?;

        Ok(user)
    })
    .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        username: user.username,
    }))
}
