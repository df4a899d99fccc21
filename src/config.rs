use crate::schemas::AppState;
use anyhow::Result;
use sea_orm::Database;

/// Initialize application state for the given database URL.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    dotenvy::dotenv().ok();

    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Every deployment re-seeds the view permissions; the bootstrap
    // skips codenames that already exist.
    migration::permissions::ensure_view_permissions(&db).await?;

    Ok(AppState { db })
}

/// Get bind address from environment or use default
pub fn get_bind_address() -> String {
    std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}
