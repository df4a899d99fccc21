use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;
use common::{CropMetrics, ProfitabilityFilter};
use compute::scope;
use model::entities::crop::{self, Season};
use model::entities::{crop_type, expense, field, output};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{page_bounds, paginate_rows, ApiResponse, AppState};

/// Request body for creating a new crop cycle
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCropRequest {
    /// Field this cycle runs on (must be within the requester's scope)
    pub field_id: i32,
    /// Catalog entry for what is being grown
    pub crop_type_id: i32,
    pub season: Season,
    pub breed: String,
    pub total_acres: Decimal,
    pub date_sowing: NaiveDate,
    pub date_harvesting: Option<NaiveDate>,
}

/// Request body for updating a crop cycle
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCropRequest {
    pub season: Option<Season>,
    pub breed: Option<String>,
    pub total_acres: Option<Decimal>,
    pub date_sowing: Option<NaiveDate>,
    pub date_harvesting: Option<NaiveDate>,
}

/// Query parameters for listing crops
#[derive(Debug, Deserialize, IntoParams)]
pub struct CropListQuery {
    /// Restrict to one field
    pub field_id: Option<i32>,
    /// Restrict to one crop type
    pub crop_type_id: Option<i32>,
    /// Restrict to one season
    pub season: Option<Season>,
    /// Filter on the derived profit figures
    pub profitability: Option<ProfitabilityFilter>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Crop response model with the derived figures attached
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CropResponse {
    pub id: i32,
    pub field_id: i32,
    pub crop_type_id: i32,
    pub season: Season,
    pub breed: String,
    pub total_acres: Decimal,
    pub date_sowing: NaiveDate,
    pub date_harvesting: Option<NaiveDate>,
    pub metrics: CropMetrics,
}

impl CropResponse {
    fn from_parts(model: crop::Model, metrics: CropMetrics) -> Self {
        Self {
            id: model.id,
            field_id: model.field_id,
            crop_type_id: model.crop_type_id,
            season: model.season,
            breed: model.breed,
            total_acres: model.total_acres,
            date_sowing: model.date_sowing,
            date_harvesting: model.date_harvesting,
            metrics,
        }
    }
}

/// Create a new crop cycle
#[utoipa::path(
    post,
    path = "/api/v1/crops",
    tag = "crops",
    request_body = CreateCropRequest,
    responses(
        (status = 201, description = "Crop created successfully", body = ApiResponse<CropResponse>),
        (status = 422, description = "Field outside the requester's scope or unknown crop type", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn create_crop(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateCropRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CropResponse>>)> {
    let principal = auth.principal();

    // The field reference must resolve through the scoped select.
    scope::fields(&principal)
        .filter(field::Column::Id.eq(request.field_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::ScopeViolation {
            field: "field_id",
            message: format!("Field {} is not available", request.field_id),
        })?;

    // The crop type catalog is global, it only has to exist.
    if crop_type::Entity::find_by_id(request.crop_type_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(ApiError::Validation {
            field: "crop_type_id",
            message: format!("Unknown crop type {}", request.crop_type_id),
        });
    }

    let model = crop::ActiveModel {
        field_id: Set(request.field_id),
        crop_type_id: Set(request.crop_type_id),
        season: Set(request.season),
        breed: Set(request.breed),
        total_acres: Set(request.total_acres),
        date_sowing: Set(request.date_sowing),
        date_harvesting: Set(request.date_harvesting),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Crop created with ID: {}, field: {}, season: {:?}",
        model.id, model.field_id, model.season
    );
    let metrics = compute::crop::metrics(&state.db, &principal, &model).await?;
    let response = ApiResponse {
        data: CropResponse::from_parts(model, metrics),
        message: "Crop created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a page of crop cycles with their profit figures.
///
/// The `profitability` filter is evaluated on the same per-row figures
/// returned in the response, so the filter and the displayed values can
/// never disagree for a row.
#[utoipa::path(
    get,
    path = "/api/v1/crops",
    tag = "crops",
    params(CropListQuery),
    responses(
        (status = 200, description = "Crops retrieved successfully", body = ApiResponse<Vec<CropResponse>>)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_crops(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CropListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<CropResponse>>>> {
    let principal = auth.principal();

    // Scoping is applied before any other filter or metric.
    let mut select = scope::crops(&principal);
    if let Some(field_id) = query.field_id {
        select = select.filter(crop::Column::FieldId.eq(field_id));
    }
    if let Some(crop_type_id) = query.crop_type_id {
        select = select.filter(crop::Column::CropTypeId.eq(crop_type_id));
    }
    if let Some(season) = query.season {
        select = select.filter(crop::Column::Season.eq(season));
    }

    let crops = select.all(&state.db).await?;
    debug!("Retrieved {} crops for user {}", crops.len(), principal.user_id);

    let mut rows = Vec::with_capacity(crops.len());
    for model in crops {
        let metrics = compute::crop::metrics(&state.db, &principal, &model).await?;
        if let Some(filter) = query.profitability {
            if !filter.matches(&metrics) {
                continue;
            }
        }
        rows.push(CropResponse::from_parts(model, metrics));
    }

    let (page, per_page) = page_bounds(query.page, query.per_page);
    let rows = paginate_rows(rows, page, per_page);

    let response = ApiResponse {
        data: rows,
        message: "Crops retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific crop by ID, with its profit figures
#[utoipa::path(
    get,
    path = "/api/v1/crops/{crop_id}",
    tag = "crops",
    params(
        ("crop_id" = i32, Path, description = "Crop ID"),
    ),
    responses(
        (status = 200, description = "Crop retrieved successfully", body = ApiResponse<CropResponse>),
        (status = 404, description = "Crop not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_crop(
    Path(crop_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CropResponse>>> {
    let principal = auth.principal();
    let model = scope::crops(&principal)
        .filter(crop::Column::Id.eq(crop_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let metrics = compute::crop::metrics(&state.db, &principal, &model).await?;
    let response = ApiResponse {
        data: CropResponse::from_parts(model, metrics),
        message: "Crop retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a crop cycle
#[utoipa::path(
    put,
    path = "/api/v1/crops/{crop_id}",
    tag = "crops",
    params(
        ("crop_id" = i32, Path, description = "Crop ID"),
    ),
    request_body = UpdateCropRequest,
    responses(
        (status = 200, description = "Crop updated successfully", body = ApiResponse<CropResponse>),
        (status = 404, description = "Crop not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_crop(
    Path(crop_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateCropRequest>,
) -> ApiResult<Json<ApiResponse<CropResponse>>> {
    let principal = auth.principal();
    let existing = scope::crops(&principal)
        .filter(crop::Column::Id.eq(crop_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut active: crop::ActiveModel = existing.into();
    if let Some(season) = request.season {
        active.season = Set(season);
    }
    if let Some(breed) = request.breed {
        active.breed = Set(breed);
    }
    if let Some(total_acres) = request.total_acres {
        active.total_acres = Set(total_acres);
    }
    if let Some(date_sowing) = request.date_sowing {
        active.date_sowing = Set(date_sowing);
    }
    if let Some(date_harvesting) = request.date_harvesting {
        active.date_harvesting = Set(Some(date_harvesting));
    }
    active.date_modified = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await?;
    info!("Crop {} updated", updated.id);

    let metrics = compute::crop::metrics(&state.db, &principal, &updated).await?;
    let response = ApiResponse {
        data: CropResponse::from_parts(updated, metrics),
        message: "Crop updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a crop cycle. Refused while expenses or outputs still
/// reference it.
#[utoipa::path(
    delete,
    path = "/api/v1/crops/{crop_id}",
    tag = "crops",
    params(
        ("crop_id" = i32, Path, description = "Crop ID"),
    ),
    responses(
        (status = 200, description = "Crop deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Crop not found", body = crate::schemas::ErrorResponse),
        (status = 409, description = "Crop still has dependent rows", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_crop(
    Path(crop_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let principal = auth.principal();
    let model = scope::crops(&principal)
        .filter(crop::Column::Id.eq(crop_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let expense_count = expense::Entity::find()
        .filter(expense::Column::CropId.eq(crop_id))
        .count(&state.db)
        .await?;
    let output_count = output::Entity::find()
        .filter(output::Column::CropId.eq(crop_id))
        .count(&state.db)
        .await?;
    if expense_count > 0 || output_count > 0 {
        return Err(ApiError::ReferentialProtection(format!(
            "Crop {crop_id} still has {expense_count} expenses and {output_count} outputs"
        )));
    }

    crop::Entity::delete_by_id(model.id).exec(&state.db).await?;
    info!("Crop {} deleted", crop_id);

    let response = ApiResponse {
        data: format!("Crop {crop_id} deleted"),
        message: "Crop deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
