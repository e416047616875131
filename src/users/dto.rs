use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::needs::repo::Need;
use crate::users::repo::User;

/// Profile projection returned to the client.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
    pub is_helper: bool,
    pub roles: Vec<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            bio: user.bio,
            phone_number: user.phone_number,
            image_url: user.image_url,
            is_helper: user.is_helper,
            roles: user.roles,
        }
    }
}

/// Full overwrite of the optional profile fields; omitted fields clear.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateEmailResponse {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct NeedResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<Need> for NeedResponse {
    fn from(need: Need) -> Self {
        Self {
            id: need.id,
            user_id: need.user_id,
            title: need.title,
            description: need.description,
            created_at: need.created_at,
        }
    }
}
