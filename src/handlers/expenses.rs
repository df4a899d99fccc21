use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;
use compute::scope;
use model::entities::expense::{self, ExpenseType};
use model::entities::{crop, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::schemas::{page_bounds, ApiResponse, AppState};

/// Request body for recording an expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateExpenseRequest {
    /// Crop this money was spent on (must be within the requester's scope)
    pub crop_id: i32,
    pub expense_type: ExpenseType,
    pub expense_date: NaiveDate,
    pub amount: Decimal,
    pub notes: Option<String>,
    /// Who handed over the cash. Must be a user the requester can see;
    /// omitted means the requester.
    pub spent_by_id: Option<i32>,
}

/// Request body for updating an expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateExpenseRequest {
    pub expense_type: Option<ExpenseType>,
    pub expense_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub notes: Option<String>,
}

/// Query parameters for listing expenses. `crop_id` is the deep link
/// from a crop's total-expense figure to its constituent rows.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ExpenseListQuery {
    pub crop_id: Option<i32>,
    pub expense_type: Option<ExpenseType>,
    pub spent_by_id: Option<i32>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Expense response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: i32,
    pub crop_id: i32,
    pub expense_type: ExpenseType,
    pub expense_date: NaiveDate,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub spent_by_id: i32,
    pub added_by_id: i32,
}

impl From<expense::Model> for ExpenseResponse {
    fn from(model: expense::Model) -> Self {
        Self {
            id: model.id,
            crop_id: model.crop_id,
            expense_type: model.expense_type,
            expense_date: model.expense_date,
            amount: model.amount,
            notes: model.notes,
            spent_by_id: model.spent_by_id,
            added_by_id: model.added_by_id,
        }
    }
}

/// Record an expense against a crop cycle
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    tag = "expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded successfully", body = ApiResponse<ExpenseResponse>),
        (status = 422, description = "Out-of-scope reference or invalid amount", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateExpenseRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ExpenseResponse>>)> {
    let principal = auth.principal();

    if request.amount < Decimal::ZERO {
        return Err(ApiError::Validation {
            field: "amount",
            message: "Amount must not be negative".to_string(),
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

    // The spender choice set is the scoped user list, so a restricted
    // principal can only record themselves.
    let spent_by_id = request.spent_by_id.unwrap_or(auth.user.id);
    scope::users(&principal)
        .filter(user::Column::Id.eq(spent_by_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::ScopeViolation {
            field: "spent_by_id",
            message: format!("User {spent_by_id} is not available"),
        })?;

    let model = expense::ActiveModel {
        crop_id: Set(request.crop_id),
        expense_type: Set(request.expense_type),
        expense_date: Set(request.expense_date),
        amount: Set(request.amount),
        notes: Set(request.notes),
        spent_by_id: Set(spent_by_id),
        added_by_id: Set(auth.user.id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Expense recorded with ID: {}, crop: {}, amount: {}",
        model.id, model.crop_id, model.amount
    );
    let response = ApiResponse {
        data: ExpenseResponse::from(model),
        message: "Expense recorded successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a page of expenses visible to the requester
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    tag = "expenses",
    params(ExpenseListQuery),
    responses(
        (status = 200, description = "Expenses retrieved successfully", body = ApiResponse<Vec<ExpenseResponse>>)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExpenseListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ExpenseResponse>>>> {
    let principal = auth.principal();
    let mut select = scope::expenses(&principal);
    if let Some(crop_id) = query.crop_id {
        select = select.filter(expense::Column::CropId.eq(crop_id));
    }
    if let Some(expense_type) = query.expense_type {
        select = select.filter(expense::Column::ExpenseType.eq(expense_type));
    }
    if let Some(spent_by_id) = query.spent_by_id {
        select = select.filter(expense::Column::SpentById.eq(spent_by_id));
    }

    let (page, per_page) = page_bounds(query.page, query.per_page);
    let expenses = select
        .paginate(&state.db, per_page)
        .fetch_page(page - 1)
        .await?;
    debug!(
        "Retrieved {} expenses for user {}",
        expenses.len(),
        principal.user_id
    );

    let response = ApiResponse {
        data: expenses.into_iter().map(ExpenseResponse::from).collect(),
        message: "Expenses retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific expense by ID
#[utoipa::path(
    get,
    path = "/api/v1/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    responses(
        (status = 200, description = "Expense retrieved successfully", body = ApiResponse<ExpenseResponse>),
        (status = 404, description = "Expense not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<ExpenseResponse>>> {
    let principal = auth.principal();
    let model = scope::expenses(&principal)
        .filter(expense::Column::Id.eq(expense_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let response = ApiResponse {
        data: ExpenseResponse::from(model),
        message: "Expense retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an expense
#[utoipa::path(
    put,
    path = "/api/v1/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated successfully", body = ApiResponse<ExpenseResponse>),
        (status = 404, description = "Expense not found", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Invalid amount", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateExpenseRequest>,
) -> ApiResult<Json<ApiResponse<ExpenseResponse>>> {
    let principal = auth.principal();
    let existing = scope::expenses(&principal)
        .filter(expense::Column::Id.eq(expense_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(amount) = request.amount {
        if amount < Decimal::ZERO {
            return Err(ApiError::Validation {
                field: "amount",
                message: "Amount must not be negative".to_string(),
            });
        }
    }

    let mut active: expense::ActiveModel = existing.into();
    if let Some(expense_type) = request.expense_type {
        active.expense_type = Set(expense_type);
    }
    if let Some(expense_date) = request.expense_date {
        active.expense_date = Set(expense_date);
    }
    if let Some(amount) = request.amount {
        active.amount = Set(amount);
    }
    if let Some(notes) = request.notes {
        active.notes = Set(Some(notes));
    }
    active.date_modified = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await?;

    let response = ApiResponse {
        data: ExpenseResponse::from(updated),
        message: "Expense updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an expense
#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    responses(
        (status = 200, description = "Expense deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Expense not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let principal = auth.principal();
    let model = scope::expenses(&principal)
        .filter(expense::Column::Id.eq(expense_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    expense::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    info!("Expense {} deleted", expense_id);

    let response = ApiResponse {
        data: format!("Expense {expense_id} deleted"),
        message: "Expense deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
