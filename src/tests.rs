//! End-to-end tests against the full router with an in-memory database.

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::ApiResponse;
use model::entities::{crop, crop_type, expense, farm, field, ledger, ledger_entry, output, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

use crate::handlers::crops::{CreateCropRequest, CropResponse};
use crate::handlers::expenses::{CreateExpenseRequest, ExpenseResponse};
use crate::handlers::farms::{CreateFarmRequest, FarmResponse};
use crate::handlers::ledger_entries::{CreateLedgerEntryRequest, LedgerEntryResponse};
use crate::handlers::ledgers::LedgerResponse;
use crate::handlers::outputs::CreateOutputRequest;
use crate::test_utils::{as_user, setup_test_app};
use common::BalanceSign;

fn dec(value: i64) -> Decimal {
    Decimal::new(value, 0)
}

async fn seed_farm(db: &DatabaseConnection, owner_id: i32, name: &str) -> farm::Model {
    farm::ActiveModel {
        name: Set(name.to_string()),
        owner_id: Set(owner_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed farm")
}

async fn seed_field(db: &DatabaseConnection, farm_id: i32) -> field::Model {
    field::ActiveModel {
        farm_id: Set(farm_id),
        name: Set("Plot".to_string()),
        location: Set(None),
        is_own_property: Set(true),
        has_electricity_tubewell: Set(false),
        has_canal_irrigation: Set(true),
        total_acres: Set(dec(10)),
        landlord_name: Set(None),
        landlord_number: Set(None),
        lease_per_acre: Set(None),
        lease_start: Set(None),
        lease_end: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed field")
}

async fn seed_crop_type(db: &DatabaseConnection, name: &str) -> crop_type::Model {
    crop_type::ActiveModel {
        name: Set(name.to_string()),
        name_ur: Set(None),
        description: Set(None),
        description_ur: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed crop type")
}

async fn seed_crop(
    db: &DatabaseConnection,
    field_id: i32,
    crop_type_id: i32,
    acres: Decimal,
) -> crop::Model {
    crop::ActiveModel {
        field_id: Set(field_id),
        crop_type_id: Set(crop_type_id),
        season: Set(crop::Season::Winter),
        breed: Set("Galaxy-2013".to_string()),
        total_acres: Set(acres),
        date_sowing: Set(NaiveDate::from_ymd_opt(2020, 11, 5).unwrap()),
        date_harvesting: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed crop")
}

async fn seed_expense(
    db: &DatabaseConnection,
    crop_id: i32,
    amount: Decimal,
    user_id: i32,
) -> expense::Model {
    expense::ActiveModel {
        crop_id: Set(crop_id),
        expense_type: Set(expense::ExpenseType::Seed),
        expense_date: Set(NaiveDate::from_ymd_opt(2021, 1, 5).unwrap()),
        amount: Set(amount),
        notes: Set(None),
        spent_by_id: Set(user_id),
        added_by_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed expense")
}

async fn seed_output(
    db: &DatabaseConnection,
    crop_id: i32,
    total_mann: Decimal,
    rate_per_mann: i32,
) -> output::Model {
    output::ActiveModel {
        crop_id: Set(crop_id),
        total_mann: Set(total_mann),
        rate_per_mann: Set(rate_per_mann),
        sold_date: Set(NaiveDate::from_ymd_opt(2021, 4, 20).unwrap()),
        notes: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed output")
}

async fn seed_ledger(db: &DatabaseConnection, farm_id: i32, name: &str) -> ledger::Model {
    ledger::ActiveModel {
        farm_id: Set(farm_id),
        name: Set(name.to_string()),
        description: Set(None),
        contact_number: Set(None),
        location: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed ledger")
}

#[tokio::test]
async fn test_health_check() {
    let (server, _db, _users) = setup_test_app().await;

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let (server, _db, _users) = setup_test_app().await;

    let response = server.get("/api/v1/farms").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_farm_crud_flow() {
    let (server, _db, users) = setup_test_app().await;
    let (name, value) = as_user(&users.owner1);

    // Create a farm (owner defaults to the requester).
    let response = server
        .post("/api/v1/farms")
        .add_header(name.clone(), value.clone())
        .json(&CreateFarmRequest {
            name: "River Farm".to_string(),
            owner_id: None,
        })
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: ApiResponse<FarmResponse> = response.json();
    assert!(body.success);
    assert_eq!(body.data.owner_id, users.owner1.id);
    let farm_id = body.data.id;

    // The owner sees it in their list.
    let response = server
        .get("/api/v1/farms")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<Vec<FarmResponse>> = response.json();
    assert_eq!(body.data.len(), 1);

    // A farm with no dependents can be deleted.
    let response = server
        .delete(&format!("/api/v1/farms/{farm_id}"))
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_restricted_cannot_create_farm_for_other_owner() {
    let (server, _db, users) = setup_test_app().await;
    let (name, value) = as_user(&users.owner1);

    let response = server
        .post("/api/v1/farms")
        .add_header(name, value)
        .json(&CreateFarmRequest {
            name: "Not mine".to_string(),
            owner_id: Some(users.owner2.id),
        })
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SCOPE_VIOLATION");
}

#[tokio::test]
async fn test_crop_metrics_scenario() {
    let (server, db, users) = setup_test_app().await;
    let (name, value) = as_user(&users.owner1);

    let farm = seed_farm(&db, users.owner1.id, "River Farm").await;
    let field = seed_field(&db, farm.id).await;
    let wheat = seed_crop_type(&db, "Wheat").await;

    // Create the crop through the API.
    let response = server
        .post("/api/v1/crops")
        .add_header(name.clone(), value.clone())
        .json(&CreateCropRequest {
            field_id: field.id,
            crop_type_id: wheat.id,
            season: crop::Season::Winter,
            breed: "Galaxy-2013".to_string(),
            total_acres: dec(4),
            date_sowing: NaiveDate::from_ymd_opt(2020, 11, 5).unwrap(),
            date_harvesting: None,
        })
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: ApiResponse<CropResponse> = response.json();
    let crop_id = created.data.id;

    // Expenses [100, 50] and one output of 2 mann at rate 80.
    for amount in [dec(100), dec(50)] {
        let response = server
            .post("/api/v1/expenses")
            .add_header(name.clone(), value.clone())
            .json(&CreateExpenseRequest {
                crop_id,
                expense_type: expense::ExpenseType::Seed,
                expense_date: NaiveDate::from_ymd_opt(2021, 1, 5).unwrap(),
                amount,
                notes: None,
                spent_by_id: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
    }
    let response = server
        .post("/api/v1/outputs")
        .add_header(name.clone(), value.clone())
        .json(&CreateOutputRequest {
            crop_id,
            total_mann: dec(2),
            rate_per_mann: 80,
            sold_date: NaiveDate::from_ymd_opt(2021, 4, 20).unwrap(),
            notes: None,
        })
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server
        .get(&format!("/api/v1/crops/{crop_id}"))
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<CropResponse> = response.json();
    let metrics = body.data.metrics;
    assert_eq!(metrics.total_expense, dec(150));
    assert_eq!(metrics.total_output, dec(160));
    assert_eq!(metrics.net_profit, dec(10));
    assert_eq!(metrics.profit_sign, BalanceSign::Positive);
    assert_eq!(metrics.net_profit, metrics.total_output - metrics.total_expense);
    // 150 / 4 acres
    assert_eq!(metrics.expense_per_acre, Some(Decimal::new(375, 1)));
}

#[tokio::test]
async fn test_profitability_filter_matches_displayed_figures() {
    let (server, db, users) = setup_test_app().await;
    let (name, value) = as_user(&users.owner1);

    let farm = seed_farm(&db, users.owner1.id, "River Farm").await;
    let field = seed_field(&db, farm.id).await;
    let wheat = seed_crop_type(&db, "Wheat").await;

    // profitable: 160 out vs 150 in
    let profitable = seed_crop(&db, field.id, wheat.id, dec(4)).await;
    seed_expense(&db, profitable.id, dec(150), users.owner1.id).await;
    seed_output(&db, profitable.id, dec(2), 80).await;

    // loss: 100 out vs 200 in
    let loss = seed_crop(&db, field.id, wheat.id, dec(4)).await;
    seed_expense(&db, loss.id, dec(200), users.owner1.id).await;
    seed_output(&db, loss.id, dec(1), 100).await;

    // balanced: 150 out vs 150 in
    let balanced = seed_crop(&db, field.id, wheat.id, dec(4)).await;
    seed_expense(&db, balanced.id, dec(150), users.owner1.id).await;
    seed_output(&db, balanced.id, dec(3), 50).await;

    for (filter, expected_id) in [
        ("profitable", profitable.id),
        ("loss", loss.id),
        ("balanced", balanced.id),
    ] {
        let response = server
            .get(&format!("/api/v1/crops?profitability={filter}"))
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<CropResponse>> = response.json();
        assert_eq!(body.data.len(), 1, "filter {filter}");
        assert_eq!(body.data[0].id, expected_id, "filter {filter}");
    }

    // The filter decision and the displayed figures agree per row.
    let response = server
        .get("/api/v1/crops?profitability=profitable")
        .add_header(name, value)
        .await;
    let body: ApiResponse<Vec<CropResponse>> = response.json();
    for row in &body.data {
        assert!(row.metrics.total_output > row.metrics.total_expense);
    }
}

#[tokio::test]
async fn test_cross_tenant_rows_are_hidden() {
    let (server, db, users) = setup_test_app().await;

    let farm1 = seed_farm(&db, users.owner1.id, "Farm One").await;
    let field1 = seed_field(&db, farm1.id).await;
    let wheat = seed_crop_type(&db, "Wheat").await;
    let crop1 = seed_crop(&db, field1.id, wheat.id, dec(4)).await;
    seed_farm(&db, users.owner2.id, "Farm Two").await;

    let (name, value) = as_user(&users.owner2);

    // Owner 2's crop list is empty: the read yields an empty result,
    // not an error.
    let response = server
        .get("/api/v1/crops")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<Vec<CropResponse>> = response.json();
    assert!(body.data.is_empty());

    // Direct fetch of the foreign crop reads as absent.
    let response = server
        .get(&format!("/api/v1/crops/{}", crop1.id))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    // Attaching an expense to the foreign crop is rejected before
    // persistence.
    let response = server
        .post("/api/v1/expenses")
        .add_header(name.clone(), value.clone())
        .json(&CreateExpenseRequest {
            crop_id: crop1.id,
            expense_type: expense::ExpenseType::Seed,
            expense_date: NaiveDate::from_ymd_opt(2021, 1, 5).unwrap(),
            amount: dec(10),
            notes: None,
            spent_by_id: None,
        })
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SCOPE_VIOLATION");
    assert_eq!(
        expense::Entity::find().count(&db).await.unwrap(),
        0,
        "nothing was persisted"
    );

    // Farm filter choices are scoped too.
    let response = server
        .get("/api/v1/farms")
        .add_header(name, value)
        .await;
    let body: ApiResponse<Vec<FarmResponse>> = response.json();
    assert_eq!(body.data.len(), 1);
    assert_eq!(body.data[0].name, "Farm Two");
}

#[tokio::test]
async fn test_ledger_balance_scenario() {
    let (server, db, users) = setup_test_app().await;
    let (name, value) = as_user(&users.owner1);

    let farm = seed_farm(&db, users.owner1.id, "River Farm").await;
    let ledger_row = seed_ledger(&db, farm.id, "Seed vendor").await;

    for (entry_type, amount) in [
        (ledger_entry::EntryType::Debit, dec(500)),
        (ledger_entry::EntryType::Debit, dec(200)),
        (ledger_entry::EntryType::Credit, dec(300)),
    ] {
        let response = server
            .post("/api/v1/ledger-entries")
            .add_header(name.clone(), value.clone())
            .json(&CreateLedgerEntryRequest {
                ledger_id: ledger_row.id,
                entry_type,
                amount,
                transaction_date: None,
                notes: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let response = server
        .get(&format!("/api/v1/ledgers/{}", ledger_row.id))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<LedgerResponse> = response.json();
    let balance = body.data.balance;
    assert_eq!(balance.total_debit, dec(700));
    assert_eq!(balance.total_credit, dec(300));
    assert_eq!(balance.net_balance, dec(-400));
    assert_eq!(balance.balance_sign, BalanceSign::Negative);

    // The debt-heavy filter includes it, the credit-heavy one does not.
    let response = server
        .get("/api/v1/ledgers?balance=debt")
        .add_header(name.clone(), value.clone())
        .await;
    let body: ApiResponse<Vec<LedgerResponse>> = response.json();
    assert_eq!(body.data.len(), 1);

    let response = server
        .get("/api/v1/ledgers?balance=credit")
        .add_header(name.clone(), value.clone())
        .await;
    let body: ApiResponse<Vec<LedgerResponse>> = response.json();
    assert!(body.data.is_empty());

    // Deep link from the total-debit figure to its constituent rows.
    let response = server
        .get(&format!(
            "/api/v1/ledger-entries?ledger_id={}&entry_type=debit",
            ledger_row.id
        ))
        .add_header(name, value)
        .await;
    let body: ApiResponse<Vec<LedgerEntryResponse>> = response.json();
    assert_eq!(body.data.len(), 2);
    let summed: Decimal = body.data.iter().map(|entry| entry.amount).sum();
    assert_eq!(summed, dec(700));
}

#[tokio::test]
async fn test_ledger_entry_minimum_amount() {
    let (server, db, users) = setup_test_app().await;
    let (name, value) = as_user(&users.owner1);

    let farm = seed_farm(&db, users.owner1.id, "River Farm").await;
    let ledger_row = seed_ledger(&db, farm.id, "Seed vendor").await;

    let response = server
        .post("/api/v1/ledger-entries")
        .add_header(name, value)
        .json(&CreateLedgerEntryRequest {
            ledger_id: ledger_row.id,
            entry_type: ledger_entry::EntryType::Debit,
            amount: Decimal::new(5, 1), // 0.5
            transaction_date: None,
            notes: None,
        })
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(ledger_entry::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_field_delete_protected_while_crops_exist() {
    let (server, db, users) = setup_test_app().await;
    let (name, value) = as_user(&users.owner1);

    let farm = seed_farm(&db, users.owner1.id, "River Farm").await;
    let field_row = seed_field(&db, farm.id).await;
    let wheat = seed_crop_type(&db, "Wheat").await;
    let crop_row = seed_crop(&db, field_row.id, wheat.id, dec(4)).await;

    let response = server
        .delete(&format!("/api/v1/fields/{}", field_row.id))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "REFERENTIAL_PROTECTION");

    // Both rows are unchanged.
    assert!(field::Entity::find_by_id(field_row.id)
        .one(&db)
        .await
        .unwrap()
        .is_some());
    assert!(crop::Entity::find_by_id(crop_row.id)
        .one(&db)
        .await
        .unwrap()
        .is_some());

    // Removing the crop first unblocks the field.
    let response = server
        .delete(&format!("/api/v1/crops/{}", crop_row.id))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::OK);

    let response = server
        .delete(&format!("/api/v1/fields/{}", field_row.id))
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_permission_bootstrap_is_idempotent() {
    let (_server, db, _users) = setup_test_app().await;

    migration::permissions::ensure_view_permissions(&db)
        .await
        .expect("first bootstrap run");
    let after_first = model::entities::permission::Entity::find()
        .count(&db)
        .await
        .unwrap();

    migration::permissions::ensure_view_permissions(&db)
        .await
        .expect("second bootstrap run");
    let after_second = model::entities::permission::Entity::find()
        .count(&db)
        .await
        .unwrap();

    assert_eq!(
        after_first,
        migration::permissions::VIEW_PERMISSION_ENTITIES.len() as u64
    );
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_superuser_sees_all_farms() {
    let (server, db, users) = setup_test_app().await;

    seed_farm(&db, users.owner1.id, "Farm One").await;
    seed_farm(&db, users.owner2.id, "Farm Two").await;

    let (name, value) = as_user(&users.admin);
    let response = server.get("/api/v1/farms").add_header(name, value).await;
    let body: ApiResponse<Vec<FarmResponse>> = response.json();
    assert_eq!(body.data.len(), 2);
}

#[tokio::test]
async fn test_expense_deep_link_matches_summed_rows() {
    let (server, db, users) = setup_test_app().await;
    let (name, value) = as_user(&users.owner1);

    let farm = seed_farm(&db, users.owner1.id, "River Farm").await;
    let field_row = seed_field(&db, farm.id).await;
    let wheat = seed_crop_type(&db, "Wheat").await;
    let crop_row = seed_crop(&db, field_row.id, wheat.id, dec(4)).await;
    seed_expense(&db, crop_row.id, dec(100), users.owner1.id).await;
    seed_expense(&db, crop_row.id, dec(50), users.owner1.id).await;

    // An unrelated crop's expense must not show up in the deep link.
    let other_crop = seed_crop(&db, field_row.id, wheat.id, dec(2)).await;
    seed_expense(&db, other_crop.id, dec(999), users.owner1.id).await;

    let response = server
        .get(&format!("/api/v1/expenses?crop_id={}", crop_row.id))
        .add_header(name.clone(), value.clone())
        .await;
    let body: ApiResponse<Vec<ExpenseResponse>> = response.json();
    assert_eq!(body.data.len(), 2);
    let summed: Decimal = body.data.iter().map(|row| row.amount).sum();

    let response = server
        .get(&format!("/api/v1/crops/{}", crop_row.id))
        .add_header(name, value)
        .await;
    let body: ApiResponse<CropResponse> = response.json();
    assert_eq!(body.data.metrics.total_expense, summed);
}

#[tokio::test]
async fn test_crop_type_localized_display() {
    let (server, db, users) = setup_test_app().await;

    let urdu_user = user::ActiveModel {
        username: Set("urdu_owner".to_string()),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        is_superuser: Set(false),
        language: Set(user::Language::Ur),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    crop_type::ActiveModel {
        name: Set("Wheat".to_string()),
        name_ur: Set(Some("گندم".to_string())),
        description: Set(None),
        description_ur: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let (name, value) = as_user(&urdu_user);
    let response = server
        .get("/api/v1/crop-types")
        .add_header(name, value)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"][0]["display_name"], "گندم");

    // An English-language user sees the English column.
    let (name, value) = as_user(&users.owner1);
    let response = server
        .get("/api/v1/crop-types")
        .add_header(name, value)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"][0]["display_name"], "Wheat");
}

#[tokio::test]
async fn test_zero_acre_crop_has_undefined_ratios() {
    let (server, db, users) = setup_test_app().await;
    let (name, value) = as_user(&users.owner1);

    let farm = seed_farm(&db, users.owner1.id, "River Farm").await;
    let field_row = seed_field(&db, farm.id).await;
    let wheat = seed_crop_type(&db, "Wheat").await;
    let crop_row = seed_crop(&db, field_row.id, wheat.id, Decimal::ZERO).await;
    seed_expense(&db, crop_row.id, dec(150), users.owner1.id).await;

    let response = server
        .get(&format!("/api/v1/crops/{}", crop_row.id))
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<CropResponse> = response.json();
    let metrics = body.data.metrics;
    // Ratios over zero acres are undefined rather than a fault.
    assert_eq!(metrics.expense_per_acre, None);
    assert_eq!(metrics.net_profit_per_acre, None);
    assert_eq!(metrics.net_profit, dec(-150));
    assert_eq!(metrics.profit_sign, BalanceSign::Negative);
}
