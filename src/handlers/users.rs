use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use compute::scope;
use model::entities::user::{self, Language};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Grant the unrestricted role (default: false)
    pub is_superuser: Option<bool>,
    /// Preferred display language (default: en)
    pub language: Option<Language>,
}

/// Request body for updating a user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Only a superuser may toggle this.
    pub is_superuser: Option<bool>,
    pub language: Option<Language>,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub is_superuser: bool,
    pub language: Language,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        let full_name = model.full_name();
        Self {
            id: model.id,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            full_name,
            is_superuser: model.is_superuser,
            language: model.language,
        }
    }
}

/// Create a new user. Requires the unrestricted role.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 403, description = "Requires the unrestricted role", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Invalid request", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    if !auth.user.is_superuser {
        warn!(
            "User {} attempted to create an account without the unrestricted role",
            auth.user.id
        );
        return Err(ApiError::Forbidden);
    }

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        first_name: Set(request.first_name.unwrap_or_default()),
        last_name: Set(request.last_name.unwrap_or_default()),
        is_superuser: Set(request.is_superuser.unwrap_or(false)),
        language: Set(request.language.unwrap_or(Language::En)),
        ..Default::default()
    };

    let user_model = new_user.insert(&state.db).await.map_err(|db_error| {
        // Unique constraint on username surfaces as a field error.
        if let DbErr::Exec(ref exec_err) = db_error {
            let message = exec_err.to_string().to_lowercase();
            if message.contains("unique") || message.contains("constraint") {
                return ApiError::Validation {
                    field: "username",
                    message: format!("Username '{}' already exists", request.username),
                };
            }
        }
        ApiError::Database(db_error)
    })?;

    info!(
        "User created with ID: {}, username: {}",
        user_model.id, user_model.username
    );
    let response = ApiResponse {
        data: UserResponse::from(user_model),
        message: "User created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all users visible to the requester. A restricted principal only
/// sees their own row.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Unknown identity", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let principal = auth.principal();
    let users = scope::users(&principal).all(&state.db).await?;
    debug!("Retrieved {} users for user {}", users.len(), principal.user_id);

    let response = ApiResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        message: "Users retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let principal = auth.principal();
    let user_model = scope::users(&principal)
        .filter(user::Column::Id.eq(user_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let response = ApiResponse {
        data: UserResponse::from(user_model),
        message: "User retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a user. Restricted principals may only update themselves and
/// may not change the role flag.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 403, description = "Role change requires the unrestricted role", body = crate::schemas::ErrorResponse),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let principal = auth.principal();

    // The scoped select already hides other users from restricted
    // principals, so an attempt on a foreign id reads as absent.
    let existing = scope::users(&principal)
        .filter(user::Column::Id.eq(user_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    if request.is_superuser.is_some() && !auth.user.is_superuser {
        return Err(ApiError::Forbidden);
    }

    let mut active: user::ActiveModel = existing.into();
    if let Some(username) = request.username {
        active.username = Set(username);
    }
    if let Some(first_name) = request.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = request.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(is_superuser) = request.is_superuser {
        active.is_superuser = Set(is_superuser);
    }
    if let Some(language) = request.language {
        active.language = Set(language);
    }
    active.date_modified = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await?;
    info!("User {} updated", updated.id);

    let response = ApiResponse {
        data: UserResponse::from(updated),
        message: "User updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
