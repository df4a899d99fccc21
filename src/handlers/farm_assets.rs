use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;
use compute::scope;
use model::entities::{farm, farm_asset};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{ApiResponse, AppState};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateFarmAssetRequest {
    pub farm_id: i32,
    pub name: String,
    pub date_purchased: NaiveDate,
    pub is_bought_new: bool,
    pub purchase_cost: Decimal,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateFarmAssetRequest {
    pub name: Option<String>,
    pub date_purchased: Option<NaiveDate>,
    pub is_bought_new: Option<bool>,
    pub purchase_cost: Option<Decimal>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FarmAssetListQuery {
    pub farm_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FarmAssetResponse {
    pub id: i32,
    pub farm_id: i32,
    pub name: String,
    pub date_purchased: NaiveDate,
    pub is_bought_new: bool,
    pub purchase_cost: Decimal,
}

impl From<farm_asset::Model> for FarmAssetResponse {
    fn from(model: farm_asset::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            name: model.name,
            date_purchased: model.date_purchased,
            is_bought_new: model.is_bought_new,
            purchase_cost: model.purchase_cost,
        }
    }
}

/// Create a farm asset
#[utoipa::path(
    post,
    path = "/api/v1/farm-assets",
    tag = "farms",
    request_body = CreateFarmAssetRequest,
    responses(
        (status = 201, description = "Asset created successfully", body = ApiResponse<FarmAssetResponse>),
        (status = 422, description = "Farm outside the requester's scope", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn create_farm_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateFarmAssetRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FarmAssetResponse>>)> {
    let principal = auth.principal();
    scope::farms(&principal)
        .filter(farm::Column::Id.eq(request.farm_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::ScopeViolation {
            field: "farm_id",
            message: format!("Farm {} is not available", request.farm_id),
        })?;

    let model = farm_asset::ActiveModel {
        farm_id: Set(request.farm_id),
        name: Set(request.name),
        date_purchased: Set(request.date_purchased),
        is_bought_new: Set(request.is_bought_new),
        purchase_cost: Set(request.purchase_cost),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Farm asset created with ID: {}", model.id);
    let response = ApiResponse {
        data: FarmAssetResponse::from(model),
        message: "Farm asset created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all farm assets visible to the requester
#[utoipa::path(
    get,
    path = "/api/v1/farm-assets",
    tag = "farms",
    params(FarmAssetListQuery),
    responses(
        (status = 200, description = "Assets retrieved successfully", body = ApiResponse<Vec<FarmAssetResponse>>)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_farm_assets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FarmAssetListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<FarmAssetResponse>>>> {
    let principal = auth.principal();
    let mut select = scope::farm_assets(&principal);
    if let Some(farm_id) = query.farm_id {
        select = select.filter(farm_asset::Column::FarmId.eq(farm_id));
    }
    let assets = select.all(&state.db).await?;

    let response = ApiResponse {
        data: assets.into_iter().map(FarmAssetResponse::from).collect(),
        message: "Farm assets retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific farm asset by ID
#[utoipa::path(
    get,
    path = "/api/v1/farm-assets/{asset_id}",
    tag = "farms",
    params(
        ("asset_id" = i32, Path, description = "Asset ID"),
    ),
    responses(
        (status = 200, description = "Asset retrieved successfully", body = ApiResponse<FarmAssetResponse>),
        (status = 404, description = "Asset not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_farm_asset(
    Path(asset_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<FarmAssetResponse>>> {
    let principal = auth.principal();
    let model = scope::farm_assets(&principal)
        .filter(farm_asset::Column::Id.eq(asset_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let response = ApiResponse {
        data: FarmAssetResponse::from(model),
        message: "Farm asset retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a farm asset
#[utoipa::path(
    put,
    path = "/api/v1/farm-assets/{asset_id}",
    tag = "farms",
    params(
        ("asset_id" = i32, Path, description = "Asset ID"),
    ),
    request_body = UpdateFarmAssetRequest,
    responses(
        (status = 200, description = "Asset updated successfully", body = ApiResponse<FarmAssetResponse>),
        (status = 404, description = "Asset not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_farm_asset(
    Path(asset_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateFarmAssetRequest>,
) -> ApiResult<Json<ApiResponse<FarmAssetResponse>>> {
    let principal = auth.principal();
    let existing = scope::farm_assets(&principal)
        .filter(farm_asset::Column::Id.eq(asset_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut active: farm_asset::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(date_purchased) = request.date_purchased {
        active.date_purchased = Set(date_purchased);
    }
    if let Some(is_bought_new) = request.is_bought_new {
        active.is_bought_new = Set(is_bought_new);
    }
    if let Some(purchase_cost) = request.purchase_cost {
        active.purchase_cost = Set(purchase_cost);
    }
    active.date_modified = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await?;

    let response = ApiResponse {
        data: FarmAssetResponse::from(updated),
        message: "Farm asset updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a farm asset
#[utoipa::path(
    delete,
    path = "/api/v1/farm-assets/{asset_id}",
    tag = "farms",
    params(
        ("asset_id" = i32, Path, description = "Asset ID"),
    ),
    responses(
        (status = 200, description = "Asset deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Asset not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_farm_asset(
    Path(asset_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let principal = auth.principal();
    let model = scope::farm_assets(&principal)
        .filter(farm_asset::Column::Id.eq(asset_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    farm_asset::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    info!("Farm asset {} deleted", asset_id);

    let response = ApiResponse {
        data: format!("Farm asset {asset_id} deleted"),
        message: "Farm asset deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
