use crate::handlers::{
    crop_types::{
        create_crop_type, delete_crop_type, get_crop_type, list_crop_types, update_crop_type,
    },
    crops::{create_crop, delete_crop, get_crop, list_crops, update_crop},
    expenses::{create_expense, delete_expense, get_expense, list_expenses, update_expense},
    farm_assets::{
        create_farm_asset, delete_farm_asset, get_farm_asset, list_farm_assets, update_farm_asset,
    },
    farms::{create_farm, delete_farm, get_farm, list_farms, update_farm},
    fields::{create_field, delete_field, get_field, list_fields, update_field},
    health::health_check,
    ledger_entries::{
        create_ledger_entry, delete_ledger_entry, get_ledger_entry, list_ledger_entries,
        update_ledger_entry,
    },
    ledgers::{create_ledger, delete_ledger, get_ledger, list_ledgers, update_ledger},
    outputs::{create_output, delete_output, get_output, list_outputs, update_output},
    users::{create_user, get_user, list_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        // Farm CRUD routes
        .route("/api/v1/farms", post(create_farm))
        .route("/api/v1/farms", get(list_farms))
        .route("/api/v1/farms/:farm_id", get(get_farm))
        .route("/api/v1/farms/:farm_id", put(update_farm))
        .route("/api/v1/farms/:farm_id", delete(delete_farm))
        // Farm asset CRUD routes
        .route("/api/v1/farm-assets", post(create_farm_asset))
        .route("/api/v1/farm-assets", get(list_farm_assets))
        .route("/api/v1/farm-assets/:asset_id", get(get_farm_asset))
        .route("/api/v1/farm-assets/:asset_id", put(update_farm_asset))
        .route("/api/v1/farm-assets/:asset_id", delete(delete_farm_asset))
        // Field CRUD routes
        .route("/api/v1/fields", post(create_field))
        .route("/api/v1/fields", get(list_fields))
        .route("/api/v1/fields/:field_id", get(get_field))
        .route("/api/v1/fields/:field_id", put(update_field))
        .route("/api/v1/fields/:field_id", delete(delete_field))
        // Crop type catalog routes
        .route("/api/v1/crop-types", post(create_crop_type))
        .route("/api/v1/crop-types", get(list_crop_types))
        .route("/api/v1/crop-types/:crop_type_id", get(get_crop_type))
        .route("/api/v1/crop-types/:crop_type_id", put(update_crop_type))
        .route("/api/v1/crop-types/:crop_type_id", delete(delete_crop_type))
        // Crop CRUD routes (with profit metrics)
        .route("/api/v1/crops", post(create_crop))
        .route("/api/v1/crops", get(list_crops))
        .route("/api/v1/crops/:crop_id", get(get_crop))
        .route("/api/v1/crops/:crop_id", put(update_crop))
        .route("/api/v1/crops/:crop_id", delete(delete_crop))
        // Expense CRUD routes
        .route("/api/v1/expenses", post(create_expense))
        .route("/api/v1/expenses", get(list_expenses))
        .route("/api/v1/expenses/:expense_id", get(get_expense))
        .route("/api/v1/expenses/:expense_id", put(update_expense))
        .route("/api/v1/expenses/:expense_id", delete(delete_expense))
        // Output CRUD routes
        .route("/api/v1/outputs", post(create_output))
        .route("/api/v1/outputs", get(list_outputs))
        .route("/api/v1/outputs/:output_id", get(get_output))
        .route("/api/v1/outputs/:output_id", put(update_output))
        .route("/api/v1/outputs/:output_id", delete(delete_output))
        // Ledger CRUD routes (with running balances)
        .route("/api/v1/ledgers", post(create_ledger))
        .route("/api/v1/ledgers", get(list_ledgers))
        .route("/api/v1/ledgers/:ledger_id", get(get_ledger))
        .route("/api/v1/ledgers/:ledger_id", put(update_ledger))
        .route("/api/v1/ledgers/:ledger_id", delete(delete_ledger))
        // Ledger entry CRUD routes
        .route("/api/v1/ledger-entries", post(create_ledger_entry))
        .route("/api/v1/ledger-entries", get(list_ledger_entries))
        .route("/api/v1/ledger-entries/:entry_id", get(get_ledger_entry))
        .route("/api/v1/ledger-entries/:entry_id", put(update_ledger_entry))
        .route(
            "/api/v1/ledger-entries/:entry_id",
            delete(delete_ledger_entry),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
