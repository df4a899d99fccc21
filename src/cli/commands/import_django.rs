use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, Set};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

use model::entities::{
    crop, crop_type, expense, farm, farm_asset, field, ledger, ledger_entry, output, user,
};

/// Main structure for Django dump
#[derive(Debug, Deserialize)]
struct DjangoRecord {
    model: String,
    #[serde(deserialize_with = "deserialize_pk")]
    pk: i32,
    fields: serde_json::Value,
}

/// Custom deserializer for pk field that handles both string and integer PKs
fn deserialize_pk<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value: serde_json::Value = serde::Deserialize::deserialize(deserializer)?;

    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom("pk number out of i32 range")),
        serde_json::Value::String(_s) => {
            // String PKs (session keys and the like) belong to records
            // the importer ignores anyway.
            Ok(0)
        }
        _ => Err(D::Error::custom("pk must be a number or string")),
    }
}

#[derive(Debug, Deserialize)]
struct DjangoUser {
    username: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    is_superuser: bool,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DjangoFarm {
    name: String,
    owner: i32,
}

#[derive(Debug, Deserialize)]
struct DjangoFarmAsset {
    farm: i32,
    name: String,
    date_purchased: String,
    is_bought_new: bool,
    purchase_cost: f64,
}

#[derive(Debug, Deserialize)]
struct DjangoCropType {
    name: String,
    #[serde(default)]
    name_ur: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    description_ur: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DjangoField {
    farm: i32,
    name: String,
    #[serde(default)]
    location: Option<String>,
    is_own_property: bool,
    #[serde(default)]
    has_electricity_tubewell: bool,
    #[serde(default)]
    has_canal_irrigation: bool,
    total_acres: f64,
    #[serde(default)]
    landlord_name: Option<String>,
    #[serde(default)]
    landlord_number: Option<String>,
    #[serde(default)]
    lease_per_acre: Option<f64>,
    #[serde(default)]
    lease_start: Option<String>,
    #[serde(default)]
    lease_end: Option<String>,
    #[serde(default = "default_true")]
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct DjangoCrop {
    field: i32,
    crop_type: i32,
    season: String,
    breed: String,
    total_acres: f64,
    date_sowing: String,
    #[serde(default)]
    date_harvesting: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DjangoExpense {
    crop: i32,
    expense_type: String,
    expense_date: String,
    amount: f64,
    #[serde(default)]
    notes: Option<String>,
    spent_by: i32,
    added_by: i32,
}

#[derive(Debug, Deserialize)]
struct DjangoOutput {
    crop: i32,
    total_mann: f64,
    rate_per_mann: i32,
    sold_date: String,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DjangoLedger {
    farm: i32,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    contact_number: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default = "default_true")]
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct DjangoLedgerEntry {
    ledger: i32,
    #[serde(rename = "type")]
    entry_type: i32,
    amount: f64,
    #[serde(default)]
    transaction_date: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

fn default_true() -> bool {
    true
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .unwrap_or_else(|_| Utc::now().naive_utc().date())
}

fn parse_datetime(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// The original application stored seasons as numeric choice codes.
fn map_season(code: &str) -> crop::Season {
    match code {
        "1" => crop::Season::Summer,
        "2" => crop::Season::Winter,
        "3" => crop::Season::MidSeason,
        other => {
            warn!("Unknown season code '{}', defaulting to Summer", other);
            crop::Season::Summer
        }
    }
}

fn map_expense_type(code: &str) -> expense::ExpenseType {
    match code {
        "1" => expense::ExpenseType::Seed,
        "2" => expense::ExpenseType::Fertilizer,
        "3" => expense::ExpenseType::Pesticides,
        "4" => expense::ExpenseType::Water,
        "5" => expense::ExpenseType::Electricity,
        "6" => expense::ExpenseType::Oil,
        "7" => expense::ExpenseType::Labour,
        "9" => expense::ExpenseType::Lease,
        "8" => expense::ExpenseType::Miscellaneous,
        other => {
            warn!(
                "Unknown expense type code '{}', defaulting to Miscellaneous",
                other
            );
            expense::ExpenseType::Miscellaneous
        }
    }
}

fn map_entry_type(code: i32) -> ledger_entry::EntryType {
    match code {
        1 => ledger_entry::EntryType::Debit,
        2 => ledger_entry::EntryType::Credit,
        other => {
            warn!("Unknown entry type code '{}', defaulting to Debit", other);
            ledger_entry::EntryType::Debit
        }
    }
}

pub async fn import_django(json_path: &str, database_url: &str) -> Result<()> {
    info!("Starting Django data import");
    debug!("JSON path: {}", json_path);
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let path = Path::new(json_path);
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", json_path))?;

    info!("Parsing JSON data...");
    let records: Vec<DjangoRecord> =
        serde_json::from_reader(file).context("Failed to parse JSON")?;
    info!("Loaded {} records from Django dump", records.len());

    let mut user_map = HashMap::new();
    let mut farm_map = HashMap::new();
    let mut field_map = HashMap::new();
    let mut crop_type_map = HashMap::new();
    let mut crop_map = HashMap::new();
    let mut ledger_map = HashMap::new();

    // First pass: users
    info!("Importing users...");
    for record in records.iter() {
        if record.model == "users.user" {
            let django_user: DjangoUser = serde_json::from_value(record.fields.clone())?;
            let language = match django_user.language.as_deref() {
                Some("ur") => user::Language::Ur,
                _ => user::Language::En,
            };
            let inserted = user::ActiveModel {
                username: Set(django_user.username.clone()),
                first_name: Set(django_user.first_name),
                last_name: Set(django_user.last_name),
                is_superuser: Set(django_user.is_superuser),
                language: Set(language),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            user_map.insert(record.pk, inserted.id);
            debug!("Imported user {} -> ID {}", django_user.username, inserted.id);
        }
    }
    info!("Imported {} users", user_map.len());

    // Second pass: crop types
    info!("Importing crop types...");
    for record in records.iter() {
        if record.model == "farms.croptype" {
            let ct: DjangoCropType = serde_json::from_value(record.fields.clone())?;
            let inserted = crop_type::ActiveModel {
                name: Set(ct.name.clone()),
                name_ur: Set(ct.name_ur),
                description: Set(ct.description),
                description_ur: Set(ct.description_ur),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            crop_type_map.insert(record.pk, inserted.id);
            debug!("Imported crop type {} -> ID {}", ct.name, inserted.id);
        }
    }
    info!("Imported {} crop types", crop_type_map.len());

    // Third pass: farms
    info!("Importing farms...");
    for record in records.iter() {
        if record.model == "farms.farm" {
            let django_farm: DjangoFarm = serde_json::from_value(record.fields.clone())?;
            let Some(&owner_id) = user_map.get(&django_farm.owner) else {
                warn!(
                    "Farm '{}' references unknown owner {}, skipping",
                    django_farm.name, django_farm.owner
                );
                continue;
            };
            let inserted = farm::ActiveModel {
                name: Set(django_farm.name.clone()),
                owner_id: Set(owner_id),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            farm_map.insert(record.pk, inserted.id);
            debug!("Imported farm {} -> ID {}", django_farm.name, inserted.id);
        }
    }
    info!("Imported {} farms", farm_map.len());

    // Fourth pass: farm assets
    info!("Importing farm assets...");
    let mut asset_count = 0;
    for record in records.iter() {
        if record.model == "farms.farmasset" {
            let asset: DjangoFarmAsset = serde_json::from_value(record.fields.clone())?;
            let Some(&farm_id) = farm_map.get(&asset.farm) else {
                continue;
            };
            farm_asset::ActiveModel {
                farm_id: Set(farm_id),
                name: Set(asset.name),
                date_purchased: Set(parse_date(&asset.date_purchased)),
                is_bought_new: Set(asset.is_bought_new),
                purchase_cost: Set(to_decimal(asset.purchase_cost)),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            asset_count += 1;
        }
    }
    info!("Imported {} farm assets", asset_count);

    // Fifth pass: fields
    info!("Importing fields...");
    for record in records.iter() {
        if record.model == "farms.field" {
            let f: DjangoField = serde_json::from_value(record.fields.clone())?;
            let Some(&farm_id) = farm_map.get(&f.farm) else {
                warn!("Field '{}' references unknown farm {}, skipping", f.name, f.farm);
                continue;
            };
            let inserted = field::ActiveModel {
                farm_id: Set(farm_id),
                name: Set(f.name.clone()),
                location: Set(f.location),
                is_own_property: Set(f.is_own_property),
                has_electricity_tubewell: Set(f.has_electricity_tubewell),
                has_canal_irrigation: Set(f.has_canal_irrigation),
                total_acres: Set(to_decimal(f.total_acres)),
                landlord_name: Set(f.landlord_name),
                landlord_number: Set(f.landlord_number),
                lease_per_acre: Set(f.lease_per_acre.map(to_decimal)),
                lease_start: Set(f.lease_start.as_deref().map(parse_date)),
                lease_end: Set(f.lease_end.as_deref().map(parse_date)),
                is_active: Set(f.is_active),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            field_map.insert(record.pk, inserted.id);
        }
    }
    info!("Imported {} fields", field_map.len());

    // Sixth pass: crops
    info!("Importing crops...");
    for record in records.iter() {
        if record.model == "farms.crop" {
            let c: DjangoCrop = serde_json::from_value(record.fields.clone())?;
            let (Some(&field_id), Some(&crop_type_id)) =
                (field_map.get(&c.field), crop_type_map.get(&c.crop_type))
            else {
                warn!("Crop {} references unknown field or crop type, skipping", record.pk);
                continue;
            };
            let inserted = crop::ActiveModel {
                field_id: Set(field_id),
                crop_type_id: Set(crop_type_id),
                season: Set(map_season(&c.season)),
                breed: Set(c.breed),
                total_acres: Set(to_decimal(c.total_acres)),
                date_sowing: Set(parse_date(&c.date_sowing)),
                date_harvesting: Set(c.date_harvesting.as_deref().map(parse_date)),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            crop_map.insert(record.pk, inserted.id);
        }
    }
    info!("Imported {} crops", crop_map.len());

    // Seventh pass: expenses and outputs
    info!("Importing expenses and outputs...");
    let mut expense_count = 0;
    let mut output_count = 0;
    for record in records.iter() {
        if record.model == "farms.expense" {
            let e: DjangoExpense = serde_json::from_value(record.fields.clone())?;
            let (Some(&crop_id), Some(&spent_by_id), Some(&added_by_id)) = (
                crop_map.get(&e.crop),
                user_map.get(&e.spent_by),
                user_map.get(&e.added_by),
            ) else {
                warn!("Expense {} has dangling references, skipping", record.pk);
                continue;
            };
            expense::ActiveModel {
                crop_id: Set(crop_id),
                expense_type: Set(map_expense_type(&e.expense_type)),
                expense_date: Set(parse_date(&e.expense_date)),
                amount: Set(to_decimal(e.amount)),
                notes: Set(e.notes),
                spent_by_id: Set(spent_by_id),
                added_by_id: Set(added_by_id),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            expense_count += 1;
        } else if record.model == "farms.output" {
            let o: DjangoOutput = serde_json::from_value(record.fields.clone())?;
            let Some(&crop_id) = crop_map.get(&o.crop) else {
                warn!("Output {} references unknown crop, skipping", record.pk);
                continue;
            };
            output::ActiveModel {
                crop_id: Set(crop_id),
                total_mann: Set(to_decimal(o.total_mann)),
                rate_per_mann: Set(o.rate_per_mann),
                sold_date: Set(parse_date(&o.sold_date)),
                notes: Set(o.notes),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            output_count += 1;
        }
    }
    info!("Imported {} expenses and {} outputs", expense_count, output_count);

    // Eighth pass: ledgers
    info!("Importing ledgers...");
    for record in records.iter() {
        if record.model == "ledgers.ledger" {
            let l: DjangoLedger = serde_json::from_value(record.fields.clone())?;
            let Some(&farm_id) = farm_map.get(&l.farm) else {
                warn!("Ledger '{}' references unknown farm {}, skipping", l.name, l.farm);
                continue;
            };
            let inserted = ledger::ActiveModel {
                farm_id: Set(farm_id),
                name: Set(l.name.clone()),
                description: Set(l.description),
                contact_number: Set(l.contact_number),
                location: Set(l.location),
                is_active: Set(l.is_active),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            ledger_map.insert(record.pk, inserted.id);
        }
    }
    info!("Imported {} ledgers", ledger_map.len());

    // Ninth pass: ledger entries
    info!("Importing ledger entries...");
    let mut entry_count = 0;
    for record in records.iter() {
        if record.model == "ledgers.ledgerentries" {
            let e: DjangoLedgerEntry = serde_json::from_value(record.fields.clone())?;
            let Some(&ledger_id) = ledger_map.get(&e.ledger) else {
                warn!("Ledger entry {} references unknown ledger, skipping", record.pk);
                continue;
            };
            ledger_entry::ActiveModel {
                ledger_id: Set(ledger_id),
                entry_type: Set(map_entry_type(e.entry_type)),
                amount: Set(to_decimal(e.amount)),
                transaction_date: Set(e
                    .transaction_date
                    .as_deref()
                    .map(parse_datetime)
                    .unwrap_or_else(Utc::now)),
                notes: Set(e.notes),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            entry_count += 1;
        }
    }
    info!("Imported {} ledger entries", entry_count);

    info!("Django data import completed successfully!");
    info!("Summary:");
    info!("  - Users: {}", user_map.len());
    info!("  - Crop Types: {}", crop_type_map.len());
    info!("  - Farms: {}", farm_map.len());
    info!("  - Farm Assets: {}", asset_count);
    info!("  - Fields: {}", field_map.len());
    info!("  - Crops: {}", crop_map.len());
    info!("  - Expenses: {}", expense_count);
    info!("  - Outputs: {}", output_count);
    info!("  - Ledgers: {}", ledger_map.len());
    info!("  - Ledger Entries: {}", entry_count);

    Ok(())
}
