//! Authentication and profile route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAuth, clear_current_user, set_current_user};
use crate::models::session::CurrentUser;
use crate::models::user::UserProfile;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Profile update request body.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Profile response body.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /users/register`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());

    auth.register(Registration {
        username: &body.username,
        email: &body.email,
        first_name: &body.first_name,
        last_name: &body.last_name,
        password: &body.password,
        password_confirm: &body.password_confirm,
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}

/// `POST /users/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.username, &body.password).await?;

    // Rotate the session ID on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("failed to rotate session: {e}")))?;

    set_current_user(
        &session,
        &CurrentUser {
            id: user.id,
            username: user.username.clone(),
        },
    )
    .await
    .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(
        json!({ "message": "Login successful", "user_id": user.id }),
    ))
}

/// `POST /users/logout`
pub async fn logout(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<impl IntoResponse> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    tracing::info!(user_id = %user.id, "user logged out");

    Ok(Json(json!({ "message": "Logout successful" })))
}

/// `GET /users/profile`
pub async fn get_profile(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ProfileView>> {
    let users = crate::db::UserRepository::new(state.pool());

    let user = users
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let profile = users.get_profile(current.id).await?;

    Ok(Json(profile_view(&user.username, user.email.as_str(), profile)))
}

/// `PUT /users/profile`
pub async fn update_profile(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileView>> {
    let users = crate::db::UserRepository::new(state.pool());

    let user = users
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let profile = UserProfile {
        phone_number: body.phone_number,
        address: body.address,
        date_of_birth: body.date_of_birth,
    };
    users.update_profile(current.id, &profile).await?;

    Ok(Json(profile_view(&user.username, user.email.as_str(), profile)))
}

fn profile_view(username: &str, email: &str, profile: UserProfile) -> ProfileView {
    ProfileView {
        username: username.to_owned(),
        email: email.to_owned(),
        phone_number: profile.phone_number,
        address: profile.address,
        date_of_birth: profile.date_of_birth,
    }
}
