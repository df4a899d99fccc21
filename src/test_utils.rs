use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::extract::USER_ID_HEADER;
use crate::router::create_router;
use crate::schemas::AppState;

/// Users seeded into every test database.
pub struct TestUsers {
    pub admin: user::Model,
    pub owner1: user::Model,
    pub owner2: user::Model,
}

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    // Referential protection relies on foreign keys being enforced.
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    is_superuser: bool,
    language: user::Language,
) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_string()),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        is_superuser: Set(is_superuser),
        language: Set(language),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test user")
}

/// Initialize tracing for tests with output to STDERR. The log level is
/// taken from RUST_LOG, defaulting to WARN.
fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| match level.to_uppercase().as_str() {
            "ERROR" => Some(Level::ERROR),
            "WARN" => Some(Level::WARN),
            "INFO" => Some(Level::INFO),
            "DEBUG" => Some(Level::DEBUG),
            "TRACE" => Some(Level::TRACE),
            _ => None,
        })
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create a test server plus direct database access and the seeded
/// users: one superuser and two unrelated owners.
pub async fn setup_test_app() -> (TestServer, DatabaseConnection, TestUsers) {
    let _ = init_test_tracing();

    let db = setup_test_db().await;

    let admin = insert_user(&db, "admin", true, user::Language::En).await;
    let owner1 = insert_user(&db, "owner1", false, user::Language::En).await;
    let owner2 = insert_user(&db, "owner2", false, user::Language::En).await;

    let state = AppState { db: db.clone() };
    let server = TestServer::new(create_router(state)).expect("Failed to start test server");

    (server, db, TestUsers { admin, owner1, owner2 })
}

/// Header pair identifying the requesting principal.
pub fn as_user(user: &user::Model) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(USER_ID_HEADER),
        HeaderValue::from_str(&user.id.to_string()).expect("user id header"),
    )
}
