//! Shared fixtures for the compute tests: an in-memory database seeded
//! with two owners, one populated ownership chain and one empty one.

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use model::entities::{
    crop, crop_type, expense, farm, field, ledger, ledger_entry, output, user,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

pub struct Seed {
    pub owner1: user::Model,
    pub owner2: user::Model,
    pub employee: user::Model,
    pub admin: user::Model,
    pub farm1: farm::Model,
    pub farm2: farm::Model,
    pub field1: field::Model,
    pub field2: field::Model,
    pub wheat: crop_type::Model,
    pub crop1: crop::Model,
    pub crop2: crop::Model,
    pub ledger1: ledger::Model,
    pub ledger2: ledger::Model,
}

async fn insert_user(db: &DatabaseConnection, username: &str, is_superuser: bool) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_string()),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        is_superuser: Set(is_superuser),
        language: Set(user::Language::En),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

async fn insert_field(db: &DatabaseConnection, farm_id: i32, name: &str) -> field::Model {
    field::ActiveModel {
        farm_id: Set(farm_id),
        name: Set(name.to_string()),
        location: Set(None),
        is_own_property: Set(true),
        has_electricity_tubewell: Set(false),
        has_canal_irrigation: Set(true),
        total_acres: Set(Decimal::new(10, 0)),
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
    .expect("insert field")
}

async fn insert_expense(
    db: &DatabaseConnection,
    crop_id: i32,
    amount: Decimal,
    spent_by: i32,
) -> expense::Model {
    expense::ActiveModel {
        crop_id: Set(crop_id),
        expense_type: Set(expense::ExpenseType::Seed),
        expense_date: Set(NaiveDate::from_ymd_opt(2021, 1, 10).unwrap()),
        amount: Set(amount),
        notes: Set(None),
        spent_by_id: Set(spent_by),
        added_by_id: Set(spent_by),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert expense")
}

async fn insert_entry(
    db: &DatabaseConnection,
    ledger_id: i32,
    entry_type: ledger_entry::EntryType,
    amount: Decimal,
) -> ledger_entry::Model {
    ledger_entry::ActiveModel {
        ledger_id: Set(ledger_id),
        entry_type: Set(entry_type),
        amount: Set(amount),
        transaction_date: Set(chrono::Utc::now()),
        notes: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert ledger entry")
}

/// Two owners: owner1's chain carries expenses [100, 50], one output of
/// 2 mann at rate 80 and ledger entries [Debit 500, Debit 200,
/// Credit 300]; owner2's chain is empty. `employee` owns no farms.
pub async fn seed() -> (DatabaseConnection, Seed) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory database");
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("enable foreign keys");
    Migrator::up(&db, None).await.expect("run migrations");

    let owner1 = insert_user(&db, "owner1", false).await;
    let owner2 = insert_user(&db, "owner2", false).await;
    let employee = insert_user(&db, "employee", false).await;
    let admin = insert_user(&db, "admin", true).await;

    let farm1 = farm::ActiveModel {
        name: Set("Farm One".to_string()),
        owner_id: Set(owner1.id),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("insert farm");
    let farm2 = farm::ActiveModel {
        name: Set("Farm Two".to_string()),
        owner_id: Set(owner2.id),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("insert farm");

    let field1 = insert_field(&db, farm1.id, "Plot A").await;
    let field2 = insert_field(&db, farm2.id, "Plot B").await;

    let wheat = crop_type::ActiveModel {
        name: Set("Wheat".to_string()),
        name_ur: Set(None),
        description: Set(None),
        description_ur: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("insert crop type");

    let crop1 = crop::ActiveModel {
        field_id: Set(field1.id),
        crop_type_id: Set(wheat.id),
        season: Set(crop::Season::Winter),
        breed: Set("Galaxy-2013".to_string()),
        total_acres: Set(Decimal::new(4, 0)),
        date_sowing: Set(NaiveDate::from_ymd_opt(2020, 11, 5).unwrap()),
        date_harvesting: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("insert crop");
    let crop2 = crop::ActiveModel {
        field_id: Set(field2.id),
        crop_type_id: Set(wheat.id),
        season: Set(crop::Season::Summer),
        breed: Set("IRRI-6".to_string()),
        total_acres: Set(Decimal::new(6, 0)),
        date_sowing: Set(NaiveDate::from_ymd_opt(2021, 5, 1).unwrap()),
        date_harvesting: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("insert crop");

    insert_expense(&db, crop1.id, Decimal::new(100, 0), owner1.id).await;
    insert_expense(&db, crop1.id, Decimal::new(50, 0), owner1.id).await;

    output::ActiveModel {
        crop_id: Set(crop1.id),
        total_mann: Set(Decimal::new(2, 0)),
        rate_per_mann: Set(80),
        sold_date: Set(NaiveDate::from_ymd_opt(2021, 4, 20).unwrap()),
        notes: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("insert output");

    let ledger1 = ledger::ActiveModel {
        farm_id: Set(farm1.id),
        name: Set("Seed vendor".to_string()),
        description: Set(None),
        contact_number: Set(None),
        location: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("insert ledger");
    let ledger2 = ledger::ActiveModel {
        farm_id: Set(farm2.id),
        name: Set("Tractor mechanic".to_string()),
        description: Set(None),
        contact_number: Set(None),
        location: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("insert ledger");

    insert_entry(&db, ledger1.id, ledger_entry::EntryType::Debit, Decimal::new(500, 0)).await;
    insert_entry(&db, ledger1.id, ledger_entry::EntryType::Debit, Decimal::new(200, 0)).await;
    insert_entry(&db, ledger1.id, ledger_entry::EntryType::Credit, Decimal::new(300, 0)).await;

    let seed = Seed {
        owner1,
        owner2,
        employee,
        admin,
        farm1,
        farm2,
        field1,
        field2,
        wheat,
        crop1,
        crop2,
        ledger1,
        ledger2,
    };
    (db, seed)
}
