use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// Error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Resolve the effective page bounds for a list request.
pub fn page_bounds(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(50).clamp(1, 200);
    (page, per_page)
}

/// Page an in-memory row set. Used by the lists that filter on derived
/// figures, where the page can only be cut after the filter has run.
pub fn paginate_rows<T>(rows: Vec<T>, page: u64, per_page: u64) -> Vec<T> {
    rows.into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .collect()
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::farms::create_farm,
        crate::handlers::farms::list_farms,
        crate::handlers::farms::get_farm,
        crate::handlers::farms::update_farm,
        crate::handlers::farms::delete_farm,
        crate::handlers::farm_assets::create_farm_asset,
        crate::handlers::farm_assets::list_farm_assets,
        crate::handlers::farm_assets::get_farm_asset,
        crate::handlers::farm_assets::update_farm_asset,
        crate::handlers::farm_assets::delete_farm_asset,
        crate::handlers::fields::create_field,
        crate::handlers::fields::list_fields,
        crate::handlers::fields::get_field,
        crate::handlers::fields::update_field,
        crate::handlers::fields::delete_field,
        crate::handlers::crop_types::create_crop_type,
        crate::handlers::crop_types::list_crop_types,
        crate::handlers::crop_types::get_crop_type,
        crate::handlers::crop_types::update_crop_type,
        crate::handlers::crop_types::delete_crop_type,
        crate::handlers::crops::create_crop,
        crate::handlers::crops::list_crops,
        crate::handlers::crops::get_crop,
        crate::handlers::crops::update_crop,
        crate::handlers::crops::delete_crop,
        crate::handlers::expenses::create_expense,
        crate::handlers::expenses::list_expenses,
        crate::handlers::expenses::get_expense,
        crate::handlers::expenses::update_expense,
        crate::handlers::expenses::delete_expense,
        crate::handlers::outputs::create_output,
        crate::handlers::outputs::list_outputs,
        crate::handlers::outputs::get_output,
        crate::handlers::outputs::update_output,
        crate::handlers::outputs::delete_output,
        crate::handlers::ledgers::create_ledger,
        crate::handlers::ledgers::list_ledgers,
        crate::handlers::ledgers::get_ledger,
        crate::handlers::ledgers::update_ledger,
        crate::handlers::ledgers::delete_ledger,
        crate::handlers::ledger_entries::create_ledger_entry,
        crate::handlers::ledger_entries::list_ledger_entries,
        crate::handlers::ledger_entries::get_ledger_entry,
        crate::handlers::ledger_entries::update_ledger_entry,
        crate::handlers::ledger_entries::delete_ledger_entry,
    ),
    components(
        schemas(
            ApiResponse<crate::handlers::users::UserResponse>,
            ApiResponse<Vec<crate::handlers::users::UserResponse>>,
            ApiResponse<crate::handlers::farms::FarmResponse>,
            ApiResponse<Vec<crate::handlers::farms::FarmResponse>>,
            ApiResponse<crate::handlers::farm_assets::FarmAssetResponse>,
            ApiResponse<Vec<crate::handlers::farm_assets::FarmAssetResponse>>,
            ApiResponse<crate::handlers::fields::FieldResponse>,
            ApiResponse<Vec<crate::handlers::fields::FieldResponse>>,
            ApiResponse<crate::handlers::crop_types::CropTypeResponse>,
            ApiResponse<Vec<crate::handlers::crop_types::CropTypeResponse>>,
            ApiResponse<crate::handlers::crops::CropResponse>,
            ApiResponse<Vec<crate::handlers::crops::CropResponse>>,
            ApiResponse<crate::handlers::expenses::ExpenseResponse>,
            ApiResponse<Vec<crate::handlers::expenses::ExpenseResponse>>,
            ApiResponse<crate::handlers::outputs::OutputResponse>,
            ApiResponse<Vec<crate::handlers::outputs::OutputResponse>>,
            ApiResponse<crate::handlers::ledgers::LedgerResponse>,
            ApiResponse<Vec<crate::handlers::ledgers::LedgerResponse>>,
            ApiResponse<crate::handlers::ledger_entries::LedgerEntryResponse>,
            ApiResponse<Vec<crate::handlers::ledger_entries::LedgerEntryResponse>>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            common::CropMetrics,
            common::LedgerBalance,
            common::BalanceSign,
            common::ProfitabilityFilter,
            common::BalanceFilter,
            model::entities::user::Language,
            model::entities::crop::Season,
            model::entities::expense::ExpenseType,
            model::entities::ledger_entry::EntryType,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::farms::CreateFarmRequest,
            crate::handlers::farms::UpdateFarmRequest,
            crate::handlers::farms::FarmResponse,
            crate::handlers::farm_assets::CreateFarmAssetRequest,
            crate::handlers::farm_assets::UpdateFarmAssetRequest,
            crate::handlers::farm_assets::FarmAssetResponse,
            crate::handlers::fields::CreateFieldRequest,
            crate::handlers::fields::UpdateFieldRequest,
            crate::handlers::fields::FieldResponse,
            crate::handlers::crop_types::CreateCropTypeRequest,
            crate::handlers::crop_types::UpdateCropTypeRequest,
            crate::handlers::crop_types::CropTypeResponse,
            crate::handlers::crops::CreateCropRequest,
            crate::handlers::crops::UpdateCropRequest,
            crate::handlers::crops::CropResponse,
            crate::handlers::expenses::CreateExpenseRequest,
            crate::handlers::expenses::UpdateExpenseRequest,
            crate::handlers::expenses::ExpenseResponse,
            crate::handlers::outputs::CreateOutputRequest,
            crate::handlers::outputs::UpdateOutputRequest,
            crate::handlers::outputs::OutputResponse,
            crate::handlers::ledgers::CreateLedgerRequest,
            crate::handlers::ledgers::UpdateLedgerRequest,
            crate::handlers::ledgers::LedgerResponse,
            crate::handlers::ledger_entries::CreateLedgerEntryRequest,
            crate::handlers::ledger_entries::UpdateLedgerEntryRequest,
            crate::handlers::ledger_entries::LedgerEntryResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Owner and employee accounts"),
        (name = "farms", description = "Farm CRUD endpoints"),
        (name = "fields", description = "Field CRUD endpoints"),
        (name = "crop-types", description = "Global crop type catalog"),
        (name = "crops", description = "Crop cycles with profit metrics"),
        (name = "expenses", description = "Crop expense endpoints"),
        (name = "outputs", description = "Harvest output endpoints"),
        (name = "ledgers", description = "Per-farm ledgers with balances"),
        (name = "ledger-entries", description = "Debit/credit entries"),
    ),
    info(
        title = "Farmbook API",
        description = "Farm bookkeeping API - ownership-scoped records of fields, crop cycles, expenses, outputs and ledgers",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
