//! This file serves as the root for all SeaORM entity modules.
//! The data models for the farm bookkeeping application live here:
//! the ownership hierarchy Farm -> Field -> Crop -> Expense/Output,
//! the per-farm ledgers with their debit/credit entries, the global
//! crop-type catalog and the seeded view permissions.

pub mod crop;
pub mod crop_type;
pub mod expense;
pub mod farm;
pub mod farm_asset;
pub mod field;
pub mod ledger;
pub mod ledger_entry;
pub mod output;
pub mod permission;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::crop::Entity as Crop;
    pub use super::crop_type::Entity as CropType;
    pub use super::expense::Entity as Expense;
    pub use super::farm::Entity as Farm;
    pub use super::farm_asset::Entity as FarmAsset;
    pub use super::field::Entity as Field;
    pub use super::ledger::Entity as Ledger;
    pub use super::ledger_entry::Entity as LedgerEntry;
    pub use super::output::Entity as Output;
    pub use super::permission::Entity as Permission;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_user(db: &DatabaseConnection, username: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            username: Set(username.to_string()),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            is_superuser: Set(false),
            language: Set(user::Language::En),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let owner = insert_user(&db, "owner").await?;
        let employee = insert_user(&db, "employee").await?;

        let farm = farm::ActiveModel {
            name: Set("River Farm".to_string()),
            owner_id: Set(owner.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let field = field::ActiveModel {
            farm_id: Set(farm.id),
            name: Set("North plot".to_string()),
            location: Set(None),
            is_own_property: Set(true),
            has_electricity_tubewell: Set(true),
            has_canal_irrigation: Set(false),
            total_acres: Set(Decimal::new(120, 1)), // 12.0
            landlord_name: Set(None),
            landlord_number: Set(None),
            lease_per_acre: Set(None),
            lease_start: Set(None),
            lease_end: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let wheat = crop_type::ActiveModel {
            name: Set("Wheat".to_string()),
            name_ur: Set(Some("گندم".to_string())),
            description: Set(Some("Winter staple".to_string())),
            description_ur: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let crop = crop::ActiveModel {
            field_id: Set(field.id),
            crop_type_id: Set(wheat.id),
            season: Set(crop::Season::Winter),
            breed: Set("Galaxy-2013".to_string()),
            total_acres: Set(Decimal::new(40, 1)), // 4.0
            date_sowing: Set(NaiveDate::from_ymd_opt(2020, 11, 5).unwrap()),
            date_harvesting: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let expense = expense::ActiveModel {
            crop_id: Set(crop.id),
            expense_type: Set(expense::ExpenseType::Seed),
            expense_date: Set(NaiveDate::from_ymd_opt(2020, 11, 1).unwrap()),
            amount: Set(Decimal::new(10000, 2)), // 100.00
            notes: Set(None),
            spent_by_id: Set(employee.id),
            added_by_id: Set(owner.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let output = output::ActiveModel {
            crop_id: Set(crop.id),
            total_mann: Set(Decimal::new(20, 1)), // 2.0
            rate_per_mann: Set(80),
            sold_date: Set(NaiveDate::from_ymd_opt(2021, 4, 20).unwrap()),
            notes: Set(Some("Sold at mandi".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let ledger = ledger::ActiveModel {
            farm_id: Set(farm.id),
            name: Set("Fertilizer dealer".to_string()),
            description: Set(None),
            contact_number: Set(Some("0300-1234567".to_string())),
            location: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let entry = ledger_entry::ActiveModel {
            ledger_id: Set(ledger.id),
            entry_type: Set(ledger_entry::EntryType::Debit),
            amount: Set(Decimal::new(500, 0)),
            transaction_date: Set(chrono::Utc::now()),
            notes: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.username == "owner"));

        let crops = Crop::find()
            .filter(crop::Column::FieldId.eq(field.id))
            .all(&db)
            .await?;
        assert_eq!(crops.len(), 1);
        assert_eq!(crops[0].breed, "Galaxy-2013");

        let expenses = Expense::find()
            .filter(expense::Column::CropId.eq(crop.id))
            .all(&db)
            .await?;
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, expense.id);
        assert_eq!(expenses[0].amount, Decimal::new(10000, 2));

        let outputs = Output::find().all(&db).await?;
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].id, output.id);
        assert_eq!(outputs[0].rate_per_mann, 80);

        let entries = LedgerEntry::find()
            .filter(ledger_entry::Column::LedgerId.eq(ledger.id))
            .all(&db)
            .await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry.id);
        assert_eq!(entries[0].entry_type, ledger_entry::EntryType::Debit);

        // Timestamps come from the column defaults.
        let farms = Farm::find().all(&db).await?;
        assert_eq!(farms.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_protection() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let owner = insert_user(&db, "owner").await?;
        let farm = farm::ActiveModel {
            name: Set("Canal Farm".to_string()),
            owner_id: Set(owner.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        let field = field::ActiveModel {
            farm_id: Set(farm.id),
            name: Set("South plot".to_string()),
            location: Set(None),
            is_own_property: Set(true),
            has_electricity_tubewell: Set(false),
            has_canal_irrigation: Set(true),
            total_acres: Set(Decimal::new(8, 0)),
            landlord_name: Set(None),
            landlord_number: Set(None),
            lease_per_acre: Set(None),
            lease_start: Set(None),
            lease_end: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Deleting a farm with a dependent field must be refused by the
        // RESTRICT foreign key, leaving both rows in place.
        let result = Farm::delete_by_id(farm.id).exec(&db).await;
        assert!(result.is_err());

        assert!(Farm::find_by_id(farm.id).one(&db).await?.is_some());
        assert!(Field::find_by_id(field.id).one(&db).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_crop_type_display_language() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let rice = crop_type::ActiveModel {
            name: Set("Rice".to_string()),
            name_ur: Set(Some("چاول".to_string())),
            description: Set(None),
            description_ur: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        assert_eq!(rice.display_name(user::Language::En), "Rice");
        assert_eq!(rice.display_name(user::Language::Ur), "چاول");

        // Missing translation falls back to the English column.
        let maize = crop_type::ActiveModel {
            name: Set("Maize".to_string()),
            name_ur: Set(None),
            description: Set(None),
            description_ur: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert_eq!(maize.display_name(user::Language::Ur), "Maize");

        Ok(())
    }
}
