use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::FirstName).default(""))
                    .col(string(Users::LastName).default(""))
                    .col(boolean(Users::IsSuperuser).default(false))
                    .col(string(Users::Language).string_len(2).default("en"))
                    .col(timestamp(Users::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(Users::DateModified).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create farms table
        manager
            .create_table(
                Table::create()
                    .table(Farms::Table)
                    .if_not_exists()
                    .col(pk_auto(Farms::Id))
                    .col(string(Farms::Name))
                    .col(integer(Farms::OwnerId))
                    .col(timestamp(Farms::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(Farms::DateModified).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farm_owner")
                            .from(Farms::Table, Farms::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create farm_assets table
        manager
            .create_table(
                Table::create()
                    .table(FarmAssets::Table)
                    .if_not_exists()
                    .col(pk_auto(FarmAssets::Id))
                    .col(integer(FarmAssets::FarmId))
                    .col(string(FarmAssets::Name))
                    .col(date(FarmAssets::DatePurchased))
                    .col(boolean(FarmAssets::IsBoughtNew))
                    .col(decimal(FarmAssets::PurchaseCost).decimal_len(16, 4))
                    .col(timestamp(FarmAssets::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(FarmAssets::DateModified).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farm_asset_farm")
                            .from(FarmAssets::Table, FarmAssets::FarmId)
                            .to(Farms::Table, Farms::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create fields table
        manager
            .create_table(
                Table::create()
                    .table(Fields::Table)
                    .if_not_exists()
                    .col(pk_auto(Fields::Id))
                    .col(integer(Fields::FarmId))
                    .col(string(Fields::Name))
                    .col(string_null(Fields::Location))
                    .col(boolean(Fields::IsOwnProperty))
                    .col(boolean(Fields::HasElectricityTubewell))
                    .col(boolean(Fields::HasCanalIrrigation))
                    .col(decimal(Fields::TotalAcres).decimal_len(10, 2))
                    .col(string_null(Fields::LandlordName))
                    .col(string_null(Fields::LandlordNumber))
                    .col(decimal_null(Fields::LeasePerAcre).decimal_len(16, 4))
                    .col(date_null(Fields::LeaseStart))
                    .col(date_null(Fields::LeaseEnd))
                    .col(boolean(Fields::IsActive).default(true))
                    .col(timestamp(Fields::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(Fields::DateModified).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_field_farm")
                            .from(Fields::Table, Fields::FarmId)
                            .to(Farms::Table, Farms::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create crop_types table (global catalog, with Urdu columns)
        manager
            .create_table(
                Table::create()
                    .table(CropTypes::Table)
                    .if_not_exists()
                    .col(pk_auto(CropTypes::Id))
                    .col(string(CropTypes::Name))
                    .col(string_null(CropTypes::NameUr))
                    .col(string_null(CropTypes::Description))
                    .col(string_null(CropTypes::DescriptionUr))
                    .col(timestamp(CropTypes::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(CropTypes::DateModified).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create crops table
        manager
            .create_table(
                Table::create()
                    .table(Crops::Table)
                    .if_not_exists()
                    .col(pk_auto(Crops::Id))
                    .col(integer(Crops::FieldId))
                    .col(integer(Crops::CropTypeId))
                    .col(string(Crops::Season).string_len(20))
                    .col(string(Crops::Breed))
                    .col(decimal(Crops::TotalAcres).decimal_len(10, 2))
                    .col(date(Crops::DateSowing))
                    .col(date_null(Crops::DateHarvesting))
                    .col(timestamp(Crops::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(Crops::DateModified).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crop_field")
                            .from(Crops::Table, Crops::FieldId)
                            .to(Fields::Table, Fields::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crop_crop_type")
                            .from(Crops::Table, Crops::CropTypeId)
                            .to(CropTypes::Table, CropTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create expenses table
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(pk_auto(Expenses::Id))
                    .col(integer(Expenses::CropId))
                    .col(string(Expenses::ExpenseType).string_len(20))
                    .col(date(Expenses::ExpenseDate))
                    .col(decimal(Expenses::Amount).decimal_len(16, 4))
                    .col(string_null(Expenses::Notes))
                    .col(integer(Expenses::SpentById))
                    .col(integer(Expenses::AddedById))
                    .col(timestamp(Expenses::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(Expenses::DateModified).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_crop")
                            .from(Expenses::Table, Expenses::CropId)
                            .to(Crops::Table, Crops::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_spent_by")
                            .from(Expenses::Table, Expenses::SpentById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_added_by")
                            .from(Expenses::Table, Expenses::AddedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create outputs table
        manager
            .create_table(
                Table::create()
                    .table(Outputs::Table)
                    .if_not_exists()
                    .col(pk_auto(Outputs::Id))
                    .col(integer(Outputs::CropId))
                    .col(decimal(Outputs::TotalMann).decimal_len(10, 2))
                    .col(integer(Outputs::RatePerMann))
                    .col(date(Outputs::SoldDate))
                    .col(string_null(Outputs::Notes))
                    .col(timestamp(Outputs::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(Outputs::DateModified).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_output_crop")
                            .from(Outputs::Table, Outputs::CropId)
                            .to(Crops::Table, Crops::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create ledgers table
        manager
            .create_table(
                Table::create()
                    .table(Ledgers::Table)
                    .if_not_exists()
                    .col(pk_auto(Ledgers::Id))
                    .col(integer(Ledgers::FarmId))
                    .col(string(Ledgers::Name))
                    .col(string_null(Ledgers::Description))
                    .col(string_null(Ledgers::ContactNumber))
                    .col(string_null(Ledgers::Location))
                    .col(boolean(Ledgers::IsActive).default(true))
                    .col(timestamp(Ledgers::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(Ledgers::DateModified).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_farm")
                            .from(Ledgers::Table, Ledgers::FarmId)
                            .to(Farms::Table, Farms::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create ledger_entries table
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(LedgerEntries::Id))
                    .col(integer(LedgerEntries::LedgerId))
                    .col(string(LedgerEntries::EntryType).string_len(10))
                    .col(decimal(LedgerEntries::Amount).decimal_len(16, 4))
                    .col(
                        timestamp(LedgerEntries::TransactionDate)
                            .default(Expr::current_timestamp()),
                    )
                    .col(string_null(LedgerEntries::Notes))
                    .col(timestamp(LedgerEntries::DateCreated).default(Expr::current_timestamp()))
                    .col(timestamp(LedgerEntries::DateModified).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entry_ledger")
                            .from(LedgerEntries::Table, LedgerEntries::LedgerId)
                            .to(Ledgers::Table, Ledgers::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create permissions table (seeded by the view-permission bootstrap)
        manager
            .create_table(
                Table::create()
                    .table(Permissions::Table)
                    .if_not_exists()
                    .col(pk_auto(Permissions::Id))
                    .col(string(Permissions::Codename).unique_key())
                    .col(string(Permissions::Name))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Permissions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Ledgers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Outputs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Crops::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CropTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Fields::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FarmAssets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Farms::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    IsSuperuser,
    Language,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum Farms {
    Table,
    Id,
    Name,
    OwnerId,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum FarmAssets {
    Table,
    Id,
    FarmId,
    Name,
    DatePurchased,
    IsBoughtNew,
    PurchaseCost,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum Fields {
    Table,
    Id,
    FarmId,
    Name,
    Location,
    IsOwnProperty,
    HasElectricityTubewell,
    HasCanalIrrigation,
    TotalAcres,
    LandlordName,
    LandlordNumber,
    LeasePerAcre,
    LeaseStart,
    LeaseEnd,
    IsActive,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum CropTypes {
    Table,
    Id,
    Name,
    NameUr,
    Description,
    DescriptionUr,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum Crops {
    Table,
    Id,
    FieldId,
    CropTypeId,
    Season,
    Breed,
    TotalAcres,
    DateSowing,
    DateHarvesting,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    CropId,
    ExpenseType,
    ExpenseDate,
    Amount,
    Notes,
    SpentById,
    AddedById,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum Outputs {
    Table,
    Id,
    CropId,
    TotalMann,
    RatePerMann,
    SoldDate,
    Notes,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum Ledgers {
    Table,
    Id,
    FarmId,
    Name,
    Description,
    ContactNumber,
    Location,
    IsActive,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum LedgerEntries {
    Table,
    Id,
    LedgerId,
    EntryType,
    Amount,
    TransactionDate,
    Notes,
    DateCreated,
    DateModified,
}

#[derive(DeriveIden)]
enum Permissions {
    Table,
    Id,
    Codename,
    Name,
}
