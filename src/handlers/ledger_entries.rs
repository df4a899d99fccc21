use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, Utc};
use compute::scope;
use model::entities::ledger;
use model::entities::ledger_entry::{self, EntryType};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{page_bounds, ApiResponse, AppState};

/// Request body for recording a ledger entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateLedgerEntryRequest {
    /// Ledger the entry belongs to (must be within the requester's scope)
    pub ledger_id: i32,
    pub entry_type: EntryType,
    /// Must be at least 1.0
    pub amount: Decimal,
    /// Defaults to now
    pub transaction_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Request body for updating a ledger entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateLedgerEntryRequest {
    pub entry_type: Option<EntryType>,
    /// Must be at least 1.0
    pub amount: Option<Decimal>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Query parameters for listing ledger entries. `ledger_id` plus
/// `entry_type` is the deep link from a ledger's debit/credit totals to
/// the rows behind them.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LedgerEntryListQuery {
    pub ledger_id: Option<i32>,
    pub entry_type: Option<EntryType>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Ledger entry response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntryResponse {
    pub id: i32,
    pub ledger_id: i32,
    pub entry_type: EntryType,
    pub amount: Decimal,
    pub transaction_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<ledger_entry::Model> for LedgerEntryResponse {
    fn from(model: ledger_entry::Model) -> Self {
        Self {
            id: model.id,
            ledger_id: model.ledger_id,
            entry_type: model.entry_type,
            amount: model.amount,
            transaction_date: model.transaction_date,
            notes: model.notes,
        }
    }
}

fn check_amount(amount: Decimal) -> ApiResult<()> {
    if amount < Decimal::ONE {
        return Err(ApiError::Validation {
            field: "amount",
            message: "Amount must be at least 1.0".to_string(),
        });
    }
    Ok(())
}

/// Record a debit or credit against a ledger
#[utoipa::path(
    post,
    path = "/api/v1/ledger-entries",
    tag = "ledger-entries",
    request_body = CreateLedgerEntryRequest,
    responses(
        (status = 201, description = "Entry recorded successfully", body = ApiResponse<LedgerEntryResponse>),
        (status = 422, description = "Out-of-scope ledger or amount below 1.0", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn create_ledger_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateLedgerEntryRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<LedgerEntryResponse>>)> {
    let principal = auth.principal();

    check_amount(request.amount)?;

    scope::ledgers(&principal)
        .filter(ledger::Column::Id.eq(request.ledger_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::ScopeViolation {
            field: "ledger_id",
            message: format!("Ledger {} is not available", request.ledger_id),
        })?;

    let model = ledger_entry::ActiveModel {
        ledger_id: Set(request.ledger_id),
        entry_type: Set(request.entry_type),
        amount: Set(request.amount),
        transaction_date: Set(request.transaction_date.unwrap_or_else(Utc::now)),
        notes: Set(request.notes),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Ledger entry recorded with ID: {}, ledger: {}, type: {:?}, amount: {}",
        model.id, model.ledger_id, model.entry_type, model.amount
    );
    let response = ApiResponse {
        data: LedgerEntryResponse::from(model),
        message: "Ledger entry recorded successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a page of ledger entries visible to the requester
#[utoipa::path(
    get,
    path = "/api/v1/ledger-entries",
    tag = "ledger-entries",
    params(LedgerEntryListQuery),
    responses(
        (status = 200, description = "Entries retrieved successfully", body = ApiResponse<Vec<LedgerEntryResponse>>)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_ledger_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LedgerEntryListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<LedgerEntryResponse>>>> {
    let principal = auth.principal();
    let mut select = scope::ledger_entries(&principal);
    if let Some(ledger_id) = query.ledger_id {
        select = select.filter(ledger_entry::Column::LedgerId.eq(ledger_id));
    }
    if let Some(entry_type) = query.entry_type {
        select = select.filter(ledger_entry::Column::EntryType.eq(entry_type));
    }

    let (page, per_page) = page_bounds(query.page, query.per_page);
    let entries = select
        .paginate(&state.db, per_page)
        .fetch_page(page - 1)
        .await?;
    debug!(
        "Retrieved {} ledger entries for user {}",
        entries.len(),
        principal.user_id
    );

    let response = ApiResponse {
        data: entries.into_iter().map(LedgerEntryResponse::from).collect(),
        message: "Ledger entries retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific ledger entry by ID
#[utoipa::path(
    get,
    path = "/api/v1/ledger-entries/{entry_id}",
    tag = "ledger-entries",
    params(
        ("entry_id" = i32, Path, description = "Entry ID"),
    ),
    responses(
        (status = 200, description = "Entry retrieved successfully", body = ApiResponse<LedgerEntryResponse>),
        (status = 404, description = "Entry not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_ledger_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<LedgerEntryResponse>>> {
    let principal = auth.principal();
    let model = scope::ledger_entries(&principal)
        .filter(ledger_entry::Column::Id.eq(entry_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let response = ApiResponse {
        data: LedgerEntryResponse::from(model),
        message: "Ledger entry retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a ledger entry
#[utoipa::path(
    put,
    path = "/api/v1/ledger-entries/{entry_id}",
    tag = "ledger-entries",
    params(
        ("entry_id" = i32, Path, description = "Entry ID"),
    ),
    request_body = UpdateLedgerEntryRequest,
    responses(
        (status = 200, description = "Entry updated successfully", body = ApiResponse<LedgerEntryResponse>),
        (status = 404, description = "Entry not found", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Amount below 1.0", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_ledger_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateLedgerEntryRequest>,
) -> ApiResult<Json<ApiResponse<LedgerEntryResponse>>> {
    let principal = auth.principal();
    let existing = scope::ledger_entries(&principal)
        .filter(ledger_entry::Column::Id.eq(entry_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(amount) = request.amount {
        check_amount(amount)?;
    }

    let mut active: ledger_entry::ActiveModel = existing.into();
    if let Some(entry_type) = request.entry_type {
        active.entry_type = Set(entry_type);
    }
    if let Some(amount) = request.amount {
        active.amount = Set(amount);
    }
    if let Some(transaction_date) = request.transaction_date {
        active.transaction_date = Set(transaction_date);
    }
    if let Some(notes) = request.notes {
        active.notes = Set(Some(notes));
    }
    active.date_modified = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    let response = ApiResponse {
        data: LedgerEntryResponse::from(updated),
        message: "Ledger entry updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a ledger entry
#[utoipa::path(
    delete,
    path = "/api/v1/ledger-entries/{entry_id}",
    tag = "ledger-entries",
    params(
        ("entry_id" = i32, Path, description = "Entry ID"),
    ),
    responses(
        (status = 200, description = "Entry deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Entry not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_ledger_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let principal = auth.principal();
    let model = scope::ledger_entries(&principal)
        .filter(ledger_entry::Column::Id.eq(entry_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    ledger_entry::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    info!("Ledger entry {} deleted", entry_id);

    let response = ApiResponse {
        data: format!("Ledger entry {entry_id} deleted"),
        message: "Ledger entry deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
