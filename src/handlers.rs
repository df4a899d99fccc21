pub mod crop_types;
pub mod crops;
pub mod expenses;
pub mod farm_assets;
pub mod farms;
pub mod fields;
pub mod health;
pub mod ledger_entries;
pub mod ledgers;
pub mod outputs;
pub mod users;
