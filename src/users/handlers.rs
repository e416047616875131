use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, Result},
    state::AppState,
    users::{
        dto::{
            MessageResponse, NeedResponse, ProfileResponse, UpdateEmailRequest,
            UpdateEmailResponse, UpdatePasswordRequest, UpdateProfileRequest,
        },
        services::{self, is_valid_email},
    },
};

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/profile", put(update_profile))
        .route("/me/email", put(update_email))
        .route("/me/password", put(update_password))
        .route("/me/needs", get(list_owned_needs))
        .route("/me/needs/saved", get(list_saved_needs))
        .route("/me/needs/saved/:id", post(save_need))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>> {
    let user = services::current_user(&*state.users, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let user = services::update_profile(&*state.users, user_id, payload).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_email(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut payload): Json<UpdateEmailRequest>,
) -> Result<Json<UpdateEmailResponse>> {
    payload.email = payload.email.trim().to_lowercase();
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }

    let email = services::update_email(&*state.users, user_id, payload.email).await?;
    Ok(Json(UpdateEmailResponse { email }))
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    if payload.new_password.len() < 8 {
        warn!("password too short");
        return Err(AppError::BadRequest("Password too short".into()));
    }

    services::update_password(
        &*state.users,
        user_id,
        &payload.old_password,
        &payload.new_password,
    )
    .await?;
    Ok(Json(MessageResponse {
        message: "Password changed successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn save_need(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(need_id): Path<Uuid>,
) -> Result<StatusCode> {
    services::save_need(&*state.users, &*state.needs, user_id, need_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_saved_needs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<NeedResponse>>> {
    let needs = services::saved_needs(&*state.users, user_id).await?;
    Ok(Json(needs.into_iter().map(NeedResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_owned_needs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<NeedResponse>>> {
    let needs = services::owned_needs(&*state.users, user_id).await?;
    Ok(Json(needs.into_iter().map(NeedResponse::from).collect()))
}
