use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::dto::RegisterRequest;
use crate::auth::password;
use crate::error::{AppError, Result};
use crate::mail::Mailer;
use crate::needs::repo::{Need, NeedStore};
use crate::users::dto::UpdateProfileRequest;
use crate::users::repo::{AuthProvider, NewUser, User, UserStore, ROLE_USER};

/// Avatar assigned to every freshly registered account.
pub const DEFAULT_AVATAR_URL: &str =
    "https://cdn.pixabay.com/photo/2014/03/25/16/54/user-297566_640.png";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Create a local account with the default role and avatar. Email uniqueness
/// is decided by the store's constraint on the insert itself.
pub async fn register(users: &dyn UserStore, req: RegisterRequest) -> Result<()> {
    let password_hash = password::hash_password(&req.password)?;
    let user = users
        .insert(NewUser {
            email: req.email,
            password_hash,
            name: req.name,
            image_url: DEFAULT_AVATAR_URL.to_string(),
            is_helper: req.is_helper,
            provider: AuthProvider::Local,
            roles: vec![ROLE_USER.to_string()],
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(())
}

/// Resolve the authenticated caller to their record. A miss here means the
/// principal refers to a record that no longer exists.
pub async fn current_user(users: &dyn UserStore, user_id: Uuid) -> Result<User> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Overwrite the optional profile fields and the display name. There are no
/// partial-update semantics: the caller sends the full set every time.
pub async fn update_profile(
    users: &dyn UserStore,
    user_id: Uuid,
    req: UpdateProfileRequest,
) -> Result<User> {
    let mut user = current_user(users, user_id).await?;
    user.image_url = req.image_url;
    user.bio = req.bio;
    user.phone_number = req.phone_number;
    user.name = req.name;
    users.update(&user).await
}

/// Change the caller's email. The unique index decides whether the address
/// is taken; a conflict leaves the stored record untouched.
pub async fn update_email(users: &dyn UserStore, user_id: Uuid, new_email: String) -> Result<String> {
    let mut user = current_user(users, user_id).await?;
    user.email = new_email;
    let user = users.update(&user).await?;
    info!(user_id = %user.id, "email updated");
    Ok(user.email)
}

/// Rotate the caller's password after verifying the old one.
pub async fn update_password(
    users: &dyn UserStore,
    user_id: Uuid,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    let mut user = current_user(users, user_id).await?;
    if !password::verify_password(old_password, &user.password_hash)? {
        return Err(AppError::IncorrectOldPassword);
    }
    user.password_hash = password::hash_password(new_password)?;
    users.update(&user).await?;
    info!(user_id = %user.id, "password updated");
    Ok(())
}

fn reset_link(public_web_url: &str, token: &str) -> String {
    format!("{public_web_url}/forget/reset_password?token={token}")
}

/// Issue a fresh reset token, replacing any outstanding one, and dispatch a
/// single reset mail. Delivery failures are logged and swallowed.
pub async fn request_password_reset(
    users: &dyn UserStore,
    mailer: &dyn Mailer,
    public_web_url: &str,
    email: &str,
) -> Result<()> {
    let mut user = users.find_by_email(email).await?.ok_or_else(|| {
        warn!(email = %email, "password reset for unknown email");
        AppError::UserNotFound
    })?;

    let token = Uuid::new_v4().to_string();
    user.reset_token = Some(token.clone());
    let user = users.update(&user).await?;

    let body = format!(
        "Hello, {}!\nTo choose a new password, follow this link: {}",
        user.name,
        reset_link(public_web_url, &token)
    );
    if let Err(e) = mailer.send(email, "Reset your password", &body).await {
        warn!(error = %e, email = %email, "reset mail dispatch failed");
    }
    info!(user_id = %user.id, "reset token issued");
    Ok(())
}

/// Look up the holder of a reset token.
pub async fn resolve_reset_token(users: &dyn UserStore, token: &str) -> Result<User> {
    users
        .find_by_reset_token(token)
        .await?
        .ok_or(AppError::InvalidResetToken)
}

/// Store the new password and spend the token.
pub async fn complete_reset(users: &dyn UserStore, mut user: User, new_password: &str) -> Result<()> {
    user.password_hash = password::hash_password(new_password)?;
    user.reset_token = None;
    let user = users.update(&user).await?;
    info!(user_id = %user.id, "password reset completed");
    Ok(())
}

/// Append a need to the caller's saved list. Repeated saves are kept as
/// repeated entries.
pub async fn save_need(
    users: &dyn UserStore,
    needs: &dyn NeedStore,
    user_id: Uuid,
    need_id: Uuid,
) -> Result<()> {
    let need = needs
        .find_by_id(need_id)
        .await?
        .ok_or(AppError::NeedNotFound)?;
    let user = current_user(users, user_id).await?;
    users.append_saved_need(user.id, need.id).await?;
    info!(user_id = %user.id, need_id = %need.id, "need saved");
    Ok(())
}

pub async fn saved_needs(users: &dyn UserStore, user_id: Uuid) -> Result<Vec<Need>> {
    let user = current_user(users, user_id).await?;
    users.saved_needs(user.id).await
}

pub async fn owned_needs(users: &dyn UserStore, user_id: Uuid) -> Result<Vec<Need>> {
    let user = current_user(users, user_id).await?;
    users.owned_needs(user.id).await
}
