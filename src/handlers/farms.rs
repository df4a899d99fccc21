use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use compute::scope;
use model::entities::{farm, farm_asset, field, ledger, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new farm
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateFarmRequest {
    /// Farm name
    pub name: String,
    /// Owner user ID. Restricted principals may only name themselves;
    /// omitted means the requester.
    pub owner_id: Option<i32>,
}

/// Request body for updating a farm
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateFarmRequest {
    pub name: Option<String>,
}

/// Farm response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FarmResponse {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
}

impl From<farm::Model> for FarmResponse {
    fn from(model: farm::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            owner_id: model.owner_id,
        }
    }
}

/// Create a new farm
#[utoipa::path(
    post,
    path = "/api/v1/farms",
    tag = "farms",
    request_body = CreateFarmRequest,
    responses(
        (status = 201, description = "Farm created successfully", body = ApiResponse<FarmResponse>),
        (status = 422, description = "Invalid request", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn create_farm(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateFarmRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FarmResponse>>)> {
    let owner_id = request.owner_id.unwrap_or(auth.user.id);

    if !auth.user.is_superuser && owner_id != auth.user.id {
        warn!(
            "User {} attempted to create a farm owned by user {}",
            auth.user.id, owner_id
        );
        return Err(ApiError::ScopeViolation {
            field: "owner_id",
            message: "Cannot create a farm for another owner".to_string(),
        });
    }

    if user::Entity::find_by_id(owner_id).one(&state.db).await?.is_none() {
        return Err(ApiError::Validation {
            field: "owner_id",
            message: format!("Unknown user {owner_id}"),
        });
    }

    let new_farm = farm::ActiveModel {
        name: Set(request.name.clone()),
        owner_id: Set(owner_id),
        ..Default::default()
    };
    let farm_model = new_farm.insert(&state.db).await?;

    info!(
        "Farm created with ID: {}, name: {}, owner: {}",
        farm_model.id, farm_model.name, farm_model.owner_id
    );
    let response = ApiResponse {
        data: FarmResponse::from(farm_model),
        message: "Farm created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all farms visible to the requester. This list is also the set of
/// selectable farms wherever a farm reference is filled in.
#[utoipa::path(
    get,
    path = "/api/v1/farms",
    tag = "farms",
    responses(
        (status = 200, description = "Farms retrieved successfully", body = ApiResponse<Vec<FarmResponse>>)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_farms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<FarmResponse>>>> {
    let principal = auth.principal();
    let farms = scope::farms(&principal).all(&state.db).await?;
    debug!("Retrieved {} farms for user {}", farms.len(), principal.user_id);

    let response = ApiResponse {
        data: farms.into_iter().map(FarmResponse::from).collect(),
        message: "Farms retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific farm by ID
#[utoipa::path(
    get,
    path = "/api/v1/farms/{farm_id}",
    tag = "farms",
    params(
        ("farm_id" = i32, Path, description = "Farm ID"),
    ),
    responses(
        (status = 200, description = "Farm retrieved successfully", body = ApiResponse<FarmResponse>),
        (status = 404, description = "Farm not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_farm(
    Path(farm_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<FarmResponse>>> {
    let principal = auth.principal();
    let farm_model = scope::farms(&principal)
        .filter(farm::Column::Id.eq(farm_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let response = ApiResponse {
        data: FarmResponse::from(farm_model),
        message: "Farm retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a farm
#[utoipa::path(
    put,
    path = "/api/v1/farms/{farm_id}",
    tag = "farms",
    params(
        ("farm_id" = i32, Path, description = "Farm ID"),
    ),
    request_body = UpdateFarmRequest,
    responses(
        (status = 200, description = "Farm updated successfully", body = ApiResponse<FarmResponse>),
        (status = 404, description = "Farm not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn update_farm(
    Path(farm_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateFarmRequest>,
) -> ApiResult<Json<ApiResponse<FarmResponse>>> {
    let principal = auth.principal();
    let existing = scope::farms(&principal)
        .filter(farm::Column::Id.eq(farm_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut active: farm::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    active.date_modified = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await?;
    info!("Farm {} updated", updated.id);

    let response = ApiResponse {
        data: FarmResponse::from(updated),
        message: "Farm updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a farm. Refused while fields, assets or ledgers still
/// reference it.
#[utoipa::path(
    delete,
    path = "/api/v1/farms/{farm_id}",
    tag = "farms",
    params(
        ("farm_id" = i32, Path, description = "Farm ID"),
    ),
    responses(
        (status = 200, description = "Farm deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Farm not found", body = crate::schemas::ErrorResponse),
        (status = 409, description = "Farm still has dependent rows", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_farm(
    Path(farm_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let principal = auth.principal();
    let farm_model = scope::farms(&principal)
        .filter(farm::Column::Id.eq(farm_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let field_count = field::Entity::find()
        .filter(field::Column::FarmId.eq(farm_id))
        .count(&state.db)
        .await?;
    let asset_count = farm_asset::Entity::find()
        .filter(farm_asset::Column::FarmId.eq(farm_id))
        .count(&state.db)
        .await?;
    let ledger_count = ledger::Entity::find()
        .filter(ledger::Column::FarmId.eq(farm_id))
        .count(&state.db)
        .await?;
    if field_count > 0 || asset_count > 0 || ledger_count > 0 {
        return Err(ApiError::ReferentialProtection(format!(
            "Farm {farm_id} still has {field_count} fields, {asset_count} assets and {ledger_count} ledgers"
        )));
    }

    farm::Entity::delete_by_id(farm_model.id)
        .exec(&state.db)
        .await?;
    info!("Farm {} deleted", farm_id);

    let response = ApiResponse {
        data: format!("Farm {farm_id} deleted"),
        message: "Farm deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
