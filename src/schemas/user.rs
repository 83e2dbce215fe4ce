use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Student, User};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterRequest {
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub(crate) password: String,
    /// Display name for the student record created alongside the account.
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserLogin {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) email: Option<String>,
    pub(crate) is_staff: bool,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_staff: user.is_staff,
            created_at: format_primitive(user.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MeResponse {
    pub(crate) user: UserResponse,
    /// Resolved role label: admin, teacher, student or unaffiliated.
    pub(crate) role: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentProfileResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) avatar: Option<String>,
}

impl StudentProfileResponse {
    pub(crate) fn from_db(student: Student) -> Self {
        Self { id: student.id, name: student.name, avatar: student.avatar }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileUpdateRequest {
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Opaque reference to an avatar image; upload storage lives outside
    /// this service.
    #[serde(default)]
    pub(crate) avatar: Option<String>,
}
