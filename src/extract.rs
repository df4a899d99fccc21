//! Principal extraction.
//!
//! Authentication itself lives in front of this service; the identity
//! provider forwards the authenticated user's id in the `X-User-Id`
//! header and this extractor resolves it to a `users` row.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::Principal;
use model::entities::user;
use sea_orm::EntityTrait;

use crate::error::ApiError;
use crate::schemas::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated requester.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: user::Model,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user.id,
            is_superuser: self.user.is_superuser,
        }
    }

    pub fn language(&self) -> user::Language {
        self.user.language
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i32>().ok())
            .ok_or(ApiError::Unauthorized)?;

        let user = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthUser { user })
    }
}
