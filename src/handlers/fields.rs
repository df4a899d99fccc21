use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;
use compute::scope;
use model::entities::{crop, farm, field};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new field
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateFieldRequest {
    /// Farm this field belongs to (must be within the requester's scope)
    pub farm_id: i32,
    pub name: String,
    pub location: Option<String>,
    pub is_own_property: bool,
    pub has_electricity_tubewell: Option<bool>,
    pub has_canal_irrigation: Option<bool>,
    pub total_acres: Decimal,
    pub landlord_name: Option<String>,
    pub landlord_number: Option<String>,
    pub lease_per_acre: Option<Decimal>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// Request body for updating a field
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateFieldRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub is_own_property: Option<bool>,
    pub has_electricity_tubewell: Option<bool>,
    pub has_canal_irrigation: Option<bool>,
    pub total_acres: Option<Decimal>,
    pub landlord_name: Option<String>,
    pub landlord_number: Option<String>,
    pub lease_per_acre: Option<Decimal>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing fields
#[derive(Debug, Deserialize, IntoParams)]
pub struct FieldListQuery {
    /// Restrict to one farm
    pub farm_id: Option<i32>,
    /// Restrict to active/inactive leases
    pub is_active: Option<bool>,
}

/// Field response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldResponse {
    pub id: i32,
    pub farm_id: i32,
    pub name: String,
    pub location: Option<String>,
    pub is_own_property: bool,
    pub has_electricity_tubewell: bool,
    pub has_canal_irrigation: bool,
    pub total_acres: Decimal,
    pub landlord_name: Option<String>,
    pub landlord_number: Option<String>,
    pub lease_per_acre: Option<Decimal>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    pub is_active: bool,
}

impl From<field::Model> for FieldResponse {
    fn from(model: field::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            name: model.name,
            location: model.location,
            is_own_property: model.is_own_property,
            has_electricity_tubewell: model.has_electricity_tubewell,
            has_canal_irrigation: model.has_canal_irrigation,
            total_acres: model.total_acres,
            landlord_name: model.landlord_name,
            landlord_number: model.landlord_number,
            lease_per_acre: model.lease_per_acre,
            lease_start: model.lease_start,
            lease_end: model.lease_end,
            is_active: model.is_active,
        }
    }
}

/// Create a new field
#[utoipa::path(
    post,
    path = "/api/v1/fields",
    tag = "fields",
    request_body = CreateFieldRequest,
    responses(
        (status = 201, description = "Field created successfully", body = ApiResponse<FieldResponse>),
        (status = 422, description = "Farm outside the requester's scope", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn create_field(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateFieldRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FieldResponse>>)> {
    let principal = auth.principal();

    // The farm reference must resolve through the scoped select, so a
    // restricted principal cannot attach a field to a foreign farm.
    scope::farms(&principal)
        .filter(farm::Column::Id.eq(request.farm_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::ScopeViolation {
            field: "farm_id",
            message: format!("Farm {} is not available", request.farm_id),
        })?;

    let new_field = field::ActiveModel {
        farm_id: Set(request.farm_id),
        name: Set(request.name),
        location: Set(request.location),
        is_own_property: Set(request.is_own_property),
        has_electricity_tubewell: Set(request.has_electricity_tubewell.unwrap_or(false)),
        has_canal_irrigation: Set(request.has_canal_irrigation.unwrap_or(false)),
        total_acres: Set(request.total_acres),
        landlord_name: Set(request.landlord_name),
        landlord_number: Set(request.landlord_number),
        lease_per_acre: Set(request.lease_per_acre),
        lease_start: Set(request.lease_start),
        lease_end: Set(request.lease_end),
        is_active: Set(request.is_active.unwrap_or(true)),
        ..Default::default()
    };
    let field_model = new_field.insert(&state.db).await?;

    info!(
        "Field created with ID: {}, farm: {}",
        field_model.id, field_model.farm_id
    );
    let response = ApiResponse {
        data: FieldResponse::from(field_model),
        message: "Field created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all fields visible to the requester
#[utoipa::path(
    get,
    path = "/api/v1/fields",
    tag = "fields",
    params(FieldListQuery),
    responses(
        (status = 200, description = "Fields retrieved successfully", body = ApiResponse<Vec<FieldResponse>>)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_fields(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FieldListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<FieldResponse>>>> {
    let principal = auth.principal();
    let mut select = scope::fields(&principal);
    if let Some(farm_id) = query.farm_id {
        select = select.filter(field::Column::FarmId.eq(farm_id));
    }
    if let Some(is_active) = query.is_active {
        select = select.filter(field::Column::IsActive.eq(is_active));
    }

    let fields = select.all(&state.db).await?;
    debug!("Retrieved {} fields for user {}", fields.len(), principal.user_id);

    let response = ApiResponse {
        data: fields.into_iter().map(FieldResponse::from).collect(),
        message: "Fields retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific field by ID
#[utoipa::path(
    get,
    path = "/api/v1/fields/{field_id}",
    tag = "fields",
    params(
        ("field_id" = i32, Path, description = "Field ID"),
    ),
    responses(
        (status = 200, description = "Field retrieved successfully", body = ApiResponse<FieldResponse>),
        (status = 404, description = "Field not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_field(
    Path(field_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<FieldResponse>>> {
    let principal = auth.principal();
    let field_model = scope::fields(&principal)
        .filter(field::Column::Id.eq(field_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let response = ApiResponse {
        data: FieldResponse::from(field_model),
        message: "Field retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a field
#[utoipa::path(
    put,
    path = "/api/v1/fields/{field_id}",
    tag = "fields",
    params(
        ("field_id" = i32, Path, description = "Field ID"),
    ),
    request_body = UpdateFieldRequest,
    responses(
        (status = 200, description = "Field updated successfully", body = ApiResponse<FieldResponse>),
        (status = 404, description = "Field not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_field(
    Path(field_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateFieldRequest>,
) -> ApiResult<Json<ApiResponse<FieldResponse>>> {
    let principal = auth.principal();
    let existing = scope::fields(&principal)
        .filter(field::Column::Id.eq(field_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut active: field::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(location) = request.location {
        active.location = Set(Some(location));
    }
    if let Some(is_own_property) = request.is_own_property {
        active.is_own_property = Set(is_own_property);
    }
    if let Some(has_electricity_tubewell) = request.has_electricity_tubewell {
        active.has_electricity_tubewell = Set(has_electricity_tubewell);
    }
    if let Some(has_canal_irrigation) = request.has_canal_irrigation {
        active.has_canal_irrigation = Set(has_canal_irrigation);
    }
    if let Some(total_acres) = request.total_acres {
        active.total_acres = Set(total_acres);
    }
    if let Some(landlord_name) = request.landlord_name {
        active.landlord_name = Set(Some(landlord_name));
    }
    if let Some(landlord_number) = request.landlord_number {
        active.landlord_number = Set(Some(landlord_number));
    }
    if let Some(lease_per_acre) = request.lease_per_acre {
        active.lease_per_acre = Set(Some(lease_per_acre));
    }
    if let Some(lease_start) = request.lease_start {
        active.lease_start = Set(Some(lease_start));
    }
    if let Some(lease_end) = request.lease_end {
        active.lease_end = Set(Some(lease_end));
    }
    if let Some(is_active) = request.is_active {
        active.is_active = Set(is_active);
    }
    active.date_modified = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await?;
    info!("Field {} updated", updated.id);

    let response = ApiResponse {
        data: FieldResponse::from(updated),
        message: "Field updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a field. Refused while crops still reference it.
#[utoipa::path(
    delete,
    path = "/api/v1/fields/{field_id}",
    tag = "fields",
    params(
        ("field_id" = i32, Path, description = "Field ID"),
    ),
    responses(
        (status = 200, description = "Field deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Field not found", body = crate::schemas::ErrorResponse),
        (status = 409, description = "Field still has crops", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_field(
    Path(field_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let principal = auth.principal();
    let field_model = scope::fields(&principal)
        .filter(field::Column::Id.eq(field_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let crop_count = crop::Entity::find()
        .filter(crop::Column::FieldId.eq(field_id))
        .count(&state.db)
        .await?;
    if crop_count > 0 {
        return Err(ApiError::ReferentialProtection(format!(
            "Field {field_id} still has {crop_count} crops"
        )));
    }

    field::Entity::delete_by_id(field_model.id)
        .exec(&state.db)
        .await?;
    info!("Field {} deleted", field_id);

    let response = ApiResponse {
        data: format!("Field {field_id} deleted"),
        message: "Field deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
