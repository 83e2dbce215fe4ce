use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::{Student, Teacher, User};
use crate::repositories;

/// The caller's role, resolved once per request with fixed precedence:
/// admin > teacher > student > unaffiliated. A staff account linked to a
/// teacher record is still Admin.
#[derive(Debug)]
pub(crate) enum Role {
    Admin,
    Teacher(Teacher),
    Student(Student),
    Unaffiliated,
}

impl Role {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher(_) => "teacher",
            Role::Student(_) => "student",
            Role::Unaffiliated => "unaffiliated",
        }
    }
}

/// Authenticated caller plus resolved role. Handlers branch on `role`
/// rather than re-checking record links themselves.
pub(crate) struct CurrentIdentity {
    pub(crate) user: User,
    pub(crate) role: Role,
}

impl CurrentIdentity {
    pub(crate) fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    pub(crate) fn teacher(&self) -> Option<&Teacher> {
        match &self.role {
            Role::Teacher(teacher) => Some(teacher),
            _ => None,
        }
    }

    pub(crate) fn student(&self) -> Option<&Student> {
        match &self.role {
            Role::Student(student) => Some(student),
            _ => None,
        }
    }
}

pub(crate) struct CurrentAdmin(pub(crate) User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        let user = repositories::users::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized("User not found"));
        };

        if !user.is_active {
            return Err(ApiError::Unauthorized("Invalid authentication credentials"));
        }

        let role = resolve_role(&app_state, &user).await?;

        Ok(CurrentIdentity { user, role })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = CurrentIdentity::from_request_parts(parts, state).await?;

        if identity.is_admin() {
            Ok(CurrentAdmin(identity.user))
        } else {
            Err(ApiError::Forbidden("Admin access required"))
        }
    }
}

async fn resolve_role(state: &AppState, user: &User) -> Result<Role, ApiError> {
    if user.is_staff {
        return Ok(Role::Admin);
    }

    let teacher = repositories::teachers::find_by_user_id(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve teacher link"))?;
    if let Some(teacher) = teacher {
        return Ok(Role::Teacher(teacher));
    }

    let student = repositories::students::find_by_user_id(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve student link"))?;
    if let Some(student) = student {
        return Ok(Role::Student(student));
    }

    Ok(Role::Unaffiliated)
}
