use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;
use compute::scope;
use model::entities::{crop, output};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{page_bounds, ApiResponse, AppState};

/// Request body for recording a harvest sale
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateOutputRequest {
    /// Crop the produce came from (must be within the requester's scope)
    pub crop_id: i32,
    pub total_mann: Decimal,
    pub rate_per_mann: i32,
    pub sold_date: NaiveDate,
    pub notes: Option<String>,
}

/// Request body for updating an output
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateOutputRequest {
    pub total_mann: Option<Decimal>,
    pub rate_per_mann: Option<i32>,
    pub sold_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Query parameters for listing outputs. `crop_id` is the deep link
/// from a crop's total-output figure to its constituent rows.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OutputListQuery {
    pub crop_id: Option<i32>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Output response model. `revenue` is the derived
/// `total_mann * rate_per_mann` for this sale event.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OutputResponse {
    pub id: i32,
    pub crop_id: i32,
    pub total_mann: Decimal,
    pub rate_per_mann: i32,
    pub revenue: Decimal,
    pub sold_date: NaiveDate,
    pub notes: Option<String>,
}

impl From<output::Model> for OutputResponse {
    fn from(model: output::Model) -> Self {
        let revenue = model.total_mann * Decimal::from(model.rate_per_mann);
        Self {
            id: model.id,
            crop_id: model.crop_id,
            total_mann: model.total_mann,
            rate_per_mann: model.rate_per_mann,
            revenue,
            sold_date: model.sold_date,
            notes: model.notes,
        }
    }
}

/// Record a harvest sale against a crop cycle
#[utoipa::path(
    post,
    path = "/api/v1/outputs",
    tag = "outputs",
    request_body = CreateOutputRequest,
    responses(
        (status = 201, description = "Output recorded successfully", body = ApiResponse<OutputResponse>),
        (status = 422, description = "Out-of-scope crop or invalid quantities", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn create_output(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateOutputRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<OutputResponse>>)> {
    let principal = auth.principal();

    if request.total_mann < Decimal::ZERO {
        return Err(ApiError::Validation {
            field: "total_mann",
            message: "Weight must not be negative".to_string(),
        });
    }
    if request.rate_per_mann < 0 {
        return Err(ApiError::Validation {
            field: "rate_per_mann",
            message: "Rate must not be negative".to_string(),
        });
    }

    scope::crops(&principal)
        .filter(crop::Column::Id.eq(request.crop_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::ScopeViolation {
            field: "crop_id",
            message: format!("Crop {} is not available", request.crop_id),
        })?;

    let model = output::ActiveModel {
        crop_id: Set(request.crop_id),
        total_mann: Set(request.total_mann),
        rate_per_mann: Set(request.rate_per_mann),
        sold_date: Set(request.sold_date),
        notes: Set(request.notes),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Output recorded with ID: {}, crop: {}, mann: {}",
        model.id, model.crop_id, model.total_mann
    );
    let response = ApiResponse {
        data: OutputResponse::from(model),
        message: "Output recorded successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a page of outputs visible to the requester
#[utoipa::path(
    get,
    path = "/api/v1/outputs",
    tag = "outputs",
    params(OutputListQuery),
    responses(
        (status = 200, description = "Outputs retrieved successfully", body = ApiResponse<Vec<OutputResponse>>)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_outputs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OutputListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<OutputResponse>>>> {
    let principal = auth.principal();
    let mut select = scope::outputs(&principal);
    if let Some(crop_id) = query.crop_id {
        select = select.filter(output::Column::CropId.eq(crop_id));
    }

    let (page, per_page) = page_bounds(query.page, query.per_page);
    let outputs = select
        .paginate(&state.db, per_page)
        .fetch_page(page - 1)
        .await?;

    let response = ApiResponse {
        data: outputs.into_iter().map(OutputResponse::from).collect(),
        message: "Outputs retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific output by ID
#[utoipa::path(
    get,
    path = "/api/v1/outputs/{output_id}",
    tag = "outputs",
    params(
        ("output_id" = i32, Path, description = "Output ID"),
    ),
    responses(
        (status = 200, description = "Output retrieved successfully", body = ApiResponse<OutputResponse>),
        (status = 404, description = "Output not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_output(
    Path(output_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<OutputResponse>>> {
    let principal = auth.principal();
    let model = scope::outputs(&principal)
        .filter(output::Column::Id.eq(output_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let response = ApiResponse {
        data: OutputResponse::from(model),
        message: "Output retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an output
#[utoipa::path(
    put,
    path = "/api/v1/outputs/{output_id}",
    tag = "outputs",
    params(
        ("output_id" = i32, Path, description = "Output ID"),
    ),
    request_body = UpdateOutputRequest,
    responses(
        (status = 200, description = "Output updated successfully", body = ApiResponse<OutputResponse>),
        (status = 404, description = "Output not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_output(
    Path(output_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateOutputRequest>,
) -> ApiResult<Json<ApiResponse<OutputResponse>>> {
    let principal = auth.principal();
    let existing = scope::outputs(&principal)
        .filter(output::Column::Id.eq(output_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(total_mann) = request.total_mann {
        if total_mann < Decimal::ZERO {
            return Err(ApiError::Validation {
                field: "total_mann",
                message: "Weight must not be negative".to_string(),
            });
        }
    }

    let mut active: output::ActiveModel = existing.into();
    if let Some(total_mann) = request.total_mann {
        active.total_mann = Set(total_mann);
    }
    if let Some(rate_per_mann) = request.rate_per_mann {
        active.rate_per_mann = Set(rate_per_mann);
    }
    if let Some(sold_date) = request.sold_date {
        active.sold_date = Set(sold_date);
    }
    if let Some(notes) = request.notes {
        active.notes = Set(Some(notes));
    }
    active.date_modified = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await?;

    let response = ApiResponse {
        data: OutputResponse::from(updated),
        message: "Output updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an output
#[utoipa::path(
    delete,
    path = "/api/v1/outputs/{output_id}",
    tag = "outputs",
    params(
        ("output_id" = i32, Path, description = "Output ID"),
    ),
    responses(
        (status = 200, description = "Output deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Output not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_output(
    Path(output_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let principal = auth.principal();
    let model = scope::outputs(&principal)
        .filter(output::Column::Id.eq(output_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    output::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    info!("Output {} deleted", output_id);

    let response = ApiResponse {
        data: format!("Output {output_id} deleted"),
        message: "Output deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
