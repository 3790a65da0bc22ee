use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub(crate) password: String,
    #[serde(alias = "fullName")]
    #[validate(length(min = 1, message = "full_name must not be empty"))]
    pub(crate) full_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: &'static str,
    pub(crate) user: UserResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            created_at: format_primitive(user.created_at),
        }
    }
}
