use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use compute::scope;
use model::entities::{crop, crop_type};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a crop type
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCropTypeRequest {
    pub name: String,
    pub name_ur: Option<String>,
    pub description: Option<String>,
    pub description_ur: Option<String>,
}

/// Request body for updating a crop type
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCropTypeRequest {
    pub name: Option<String>,
    pub name_ur: Option<String>,
    pub description: Option<String>,
    pub description_ur: Option<String>,
}

/// Crop type response model. `display_name`/`display_description` are
/// resolved against the requester's preferred language.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CropTypeResponse {
    pub id: i32,
    pub name: String,
    pub name_ur: Option<String>,
    pub description: Option<String>,
    pub description_ur: Option<String>,
    pub display_name: String,
    pub display_description: Option<String>,
}

impl CropTypeResponse {
    fn localized(model: crop_type::Model, language: model::entities::user::Language) -> Self {
        let display_name = model.display_name(language).to_string();
        let display_description = model.display_description(language).map(str::to_string);
        Self {
            id: model.id,
            name: model.name,
            name_ur: model.name_ur,
            description: model.description,
            description_ur: model.description_ur,
            display_name,
            display_description,
        }
    }
}

/// Create a crop type. Catalog writes require the unrestricted role.
#[utoipa::path(
    post,
    path = "/api/v1/crop-types",
    tag = "crop-types",
    request_body = CreateCropTypeRequest,
    responses(
        (status = 201, description = "Crop type created successfully", body = ApiResponse<CropTypeResponse>),
        (status = 403, description = "Requires the unrestricted role", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn create_crop_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateCropTypeRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CropTypeResponse>>)> {
    if !auth.user.is_superuser {
        return Err(ApiError::Forbidden);
    }

    let model = crop_type::ActiveModel {
        name: Set(request.name),
        name_ur: Set(request.name_ur),
        description: Set(request.description),
        description_ur: Set(request.description_ur),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Crop type created with ID: {}, name: {}", model.id, model.name);
    let response = ApiResponse {
        data: CropTypeResponse::localized(model, auth.language()),
        message: "Crop type created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get the crop type catalog. Global reference data, visible to every
/// principal.
#[utoipa::path(
    get,
    path = "/api/v1/crop-types",
    tag = "crop-types",
    responses(
        (status = 200, description = "Crop types retrieved successfully", body = ApiResponse<Vec<CropTypeResponse>>)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_crop_types(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<CropTypeResponse>>>> {
    let principal = auth.principal();
    let language = auth.language();
    let catalog = scope::crop_types(&principal).all(&state.db).await?;

    let response = ApiResponse {
        data: catalog
            .into_iter()
            .map(|model| CropTypeResponse::localized(model, language))
            .collect(),
        message: "Crop types retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific crop type by ID
#[utoipa::path(
    get,
    path = "/api/v1/crop-types/{crop_type_id}",
    tag = "crop-types",
    params(
        ("crop_type_id" = i32, Path, description = "Crop type ID"),
    ),
    responses(
        (status = 200, description = "Crop type retrieved successfully", body = ApiResponse<CropTypeResponse>),
        (status = 404, description = "Crop type not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_crop_type(
    Path(crop_type_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CropTypeResponse>>> {
    let model = crop_type::Entity::find_by_id(crop_type_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let response = ApiResponse {
        data: CropTypeResponse::localized(model, auth.language()),
        message: "Crop type retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a crop type. Requires the unrestricted role.
#[utoipa::path(
    put,
    path = "/api/v1/crop-types/{crop_type_id}",
    tag = "crop-types",
    params(
        ("crop_type_id" = i32, Path, description = "Crop type ID"),
    ),
    request_body = UpdateCropTypeRequest,
    responses(
        (status = 200, description = "Crop type updated successfully", body = ApiResponse<CropTypeResponse>),
        (status = 403, description = "Requires the unrestricted role", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Crop type not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_crop_type(
    Path(crop_type_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateCropTypeRequest>,
) -> ApiResult<Json<ApiResponse<CropTypeResponse>>> {
    if !auth.user.is_superuser {
        return Err(ApiError::Forbidden);
    }

    let existing = crop_type::Entity::find_by_id(crop_type_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut active: crop_type::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(name_ur) = request.name_ur {
        active.name_ur = Set(Some(name_ur));
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(description_ur) = request.description_ur {
        active.description_ur = Set(Some(description_ur));
    }
    active.date_modified = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await?;
    info!("Crop type {} updated", updated.id);

    let response = ApiResponse {
        data: CropTypeResponse::localized(updated, auth.language()),
        message: "Crop type updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a crop type. Refused while crops still reference it.
#[utoipa::path(
    delete,
    path = "/api/v1/crop-types/{crop_type_id}",
    tag = "crop-types",
    params(
        ("crop_type_id" = i32, Path, description = "Crop type ID"),
    ),
    responses(
        (status = 200, description = "Crop type deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Requires the unrestricted role", body = crate::schemas::ErrorResponse),
        (status = 409, description = "Crop type is still referenced", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_crop_type(
    Path(crop_type_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    if !auth.user.is_superuser {
        return Err(ApiError::Forbidden);
    }

    let model = crop_type::Entity::find_by_id(crop_type_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let crop_count = crop::Entity::find()
        .filter(crop::Column::CropTypeId.eq(crop_type_id))
        .count(&state.db)
        .await?;
    if crop_count > 0 {
        return Err(ApiError::ReferentialProtection(format!(
            "Crop type {crop_type_id} is still referenced by {crop_count} crops"
        )));
    }

    crop_type::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    info!("Crop type {} deleted", crop_type_id);

    let response = ApiResponse {
        data: format!("Crop type {crop_type_id} deleted"),
        message: "Crop type deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
