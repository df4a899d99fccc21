use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use common::{BalanceFilter, LedgerBalance};
use compute::scope;
use model::entities::{farm, ledger, ledger_entry};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{page_bounds, paginate_rows, ApiResponse, AppState};

/// Request body for creating a ledger
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateLedgerRequest {
    /// Farm the account is kept under (must be within the requester's scope)
    pub farm_id: i32,
    /// Counterparty name
    pub name: String,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for updating a ledger
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateLedgerRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing ledgers
#[derive(Debug, Deserialize, IntoParams)]
pub struct LedgerListQuery {
    /// Restrict to one farm
    pub farm_id: Option<i32>,
    pub is_active: Option<bool>,
    /// Filter on the derived running balance
    pub balance: Option<BalanceFilter>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Ledger response model with the derived balance attached
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LedgerResponse {
    pub id: i32,
    pub farm_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
    pub balance: LedgerBalance,
}

impl LedgerResponse {
    fn from_parts(model: ledger::Model, balance: LedgerBalance) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            name: model.name,
            description: model.description,
            contact_number: model.contact_number,
            location: model.location,
            is_active: model.is_active,
            balance,
        }
    }
}

/// Create a ledger
#[utoipa::path(
    post,
    path = "/api/v1/ledgers",
    tag = "ledgers",
    request_body = CreateLedgerRequest,
    responses(
        (status = 201, description = "Ledger created successfully", body = ApiResponse<LedgerResponse>),
        (status = 422, description = "Farm outside the requester's scope", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn create_ledger(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateLedgerRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<LedgerResponse>>)> {
    let principal = auth.principal();

    scope::farms(&principal)
        .filter(farm::Column::Id.eq(request.farm_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::ScopeViolation {
            field: "farm_id",
            message: format!("Farm {} is not available", request.farm_id),
        })?;

    let model = ledger::ActiveModel {
        farm_id: Set(request.farm_id),
        name: Set(request.name),
        description: Set(request.description),
        contact_number: Set(request.contact_number),
        location: Set(request.location),
        is_active: Set(request.is_active.unwrap_or(true)),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Ledger created with ID: {}, farm: {}, name: {}",
        model.id, model.farm_id, model.name
    );
    let balance = compute::ledger::balance(&state.db, &principal, model.id).await?;
    let response = ApiResponse {
        data: LedgerResponse::from_parts(model, balance),
        message: "Ledger created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a page of ledgers with their running balances.
///
/// The `balance` filter (more debt / more credit / balanced) is
/// evaluated on the same per-row totals returned in the response.
#[utoipa::path(
    get,
    path = "/api/v1/ledgers",
    tag = "ledgers",
    params(LedgerListQuery),
    responses(
        (status = 200, description = "Ledgers retrieved successfully", body = ApiResponse<Vec<LedgerResponse>>)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_ledgers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LedgerListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<LedgerResponse>>>> {
    let principal = auth.principal();

    let mut select = scope::ledgers(&principal);
    if let Some(farm_id) = query.farm_id {
        select = select.filter(ledger::Column::FarmId.eq(farm_id));
    }
    if let Some(is_active) = query.is_active {
        select = select.filter(ledger::Column::IsActive.eq(is_active));
    }

    let ledgers = select.all(&state.db).await?;
    debug!(
        "Retrieved {} ledgers for user {}",
        ledgers.len(),
        principal.user_id
    );

    let mut rows = Vec::with_capacity(ledgers.len());
    for model in ledgers {
        let balance = compute::ledger::balance(&state.db, &principal, model.id).await?;
        if let Some(filter) = query.balance {
            if !filter.matches(&balance) {
                continue;
            }
        }
        rows.push(LedgerResponse::from_parts(model, balance));
    }

    let (page, per_page) = page_bounds(query.page, query.per_page);
    let rows = paginate_rows(rows, page, per_page);

    let response = ApiResponse {
        data: rows,
        message: "Ledgers retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific ledger by ID, with its running balance
#[utoipa::path(
    get,
    path = "/api/v1/ledgers/{ledger_id}",
    tag = "ledgers",
    params(
        ("ledger_id" = i32, Path, description = "Ledger ID"),
    ),
    responses(
        (status = 200, description = "Ledger retrieved successfully", body = ApiResponse<LedgerResponse>),
        (status = 404, description = "Ledger not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_ledger(
    Path(ledger_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<LedgerResponse>>> {
    let principal = auth.principal();
    let model = scope::ledgers(&principal)
        .filter(ledger::Column::Id.eq(ledger_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let balance = compute::ledger::balance(&state.db, &principal, model.id).await?;
    let response = ApiResponse {
        data: LedgerResponse::from_parts(model, balance),
        message: "Ledger retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a ledger
#[utoipa::path(
    put,
    path = "/api/v1/ledgers/{ledger_id}",
    tag = "ledgers",
    params(
        ("ledger_id" = i32, Path, description = "Ledger ID"),
    ),
    request_body = UpdateLedgerRequest,
    responses(
        (status = 200, description = "Ledger updated successfully", body = ApiResponse<LedgerResponse>),
        (status = 404, description = "Ledger not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_ledger(
    Path(ledger_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateLedgerRequest>,
) -> ApiResult<Json<ApiResponse<LedgerResponse>>> {
    let principal = auth.principal();
    let existing = scope::ledgers(&principal)
        .filter(ledger::Column::Id.eq(ledger_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut active: ledger::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(contact_number) = request.contact_number {
        active.contact_number = Set(Some(contact_number));
    }
    if let Some(location) = request.location {
        active.location = Set(Some(location));
    }
    if let Some(is_active) = request.is_active {
        active.is_active = Set(is_active);
    }
    active.date_modified = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await?;
    info!("Ledger {} updated", updated.id);

    let balance = compute::ledger::balance(&state.db, &principal, updated.id).await?;
    let response = ApiResponse {
        data: LedgerResponse::from_parts(updated, balance),
        message: "Ledger updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a ledger. Refused while entries still reference it.
#[utoipa::path(
    delete,
    path = "/api/v1/ledgers/{ledger_id}",
    tag = "ledgers",
    params(
        ("ledger_id" = i32, Path, description = "Ledger ID"),
    ),
    responses(
        (status = 200, description = "Ledger deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Ledger not found", body = crate::schemas::ErrorResponse),
        (status = 409, description = "Ledger still has entries", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_ledger(
    Path(ledger_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let principal = auth.principal();
    let model = scope::ledgers(&principal)
        .filter(ledger::Column::Id.eq(ledger_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let entry_count = ledger_entry::Entity::find()
        .filter(ledger_entry::Column::LedgerId.eq(ledger_id))
        .count(&state.db)
        .await?;
    if entry_count > 0 {
        return Err(ApiError::ReferentialProtection(format!(
            "Ledger {ledger_id} still has {entry_count} entries"
        )));
    }

    ledger::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    info!("Ledger {} deleted", ledger_id);

    let response = ApiResponse {
        data: format!("Ledger {ledger_id} deleted"),
        message: "Ledger deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
