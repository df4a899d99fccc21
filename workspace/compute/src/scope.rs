//! Per-entity ownership scoping.
//!
//! Each function returns a `Select` already restricted to the rows the
//! principal may see: the full table for a superuser, otherwise only
//! rows whose ownership chain ends at a farm owned by the principal.
//! Callers must start every read (and every parent lookup on a write)
//! from one of these selects, so that nothing downstream ever touches a
//! row from another owner's farm.

use common::Principal;
use model::entities::{
    crop, crop_type, expense, farm, farm_asset, field, ledger, ledger_entry, output, user,
};
use sea_orm::{ColumnTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait, Select};

/// Farms: `owner_id = principal`.
pub fn farms(principal: &Principal) -> Select<farm::Entity> {
    let query = farm::Entity::find();
    if principal.is_superuser {
        query
    } else {
        query.filter(farm::Column::OwnerId.eq(principal.user_id))
    }
}

/// Fields: one hop, `farm.owner_id = principal`.
pub fn fields(principal: &Principal) -> Select<field::Entity> {
    let query = field::Entity::find();
    if principal.is_superuser {
        query
    } else {
        query
            .join(JoinType::InnerJoin, field::Relation::Farm.def())
            .filter(farm::Column::OwnerId.eq(principal.user_id))
    }
}

/// Farm assets: one hop, `farm.owner_id = principal`.
pub fn farm_assets(principal: &Principal) -> Select<farm_asset::Entity> {
    let query = farm_asset::Entity::find();
    if principal.is_superuser {
        query
    } else {
        query
            .join(JoinType::InnerJoin, farm_asset::Relation::Farm.def())
            .filter(farm::Column::OwnerId.eq(principal.user_id))
    }
}

/// Crop types are global reference data, visible to everyone.
pub fn crop_types(_principal: &Principal) -> Select<crop_type::Entity> {
    crop_type::Entity::find()
}

/// Crops: `field.farm.owner_id = principal`.
pub fn crops(principal: &Principal) -> Select<crop::Entity> {
    let query = crop::Entity::find();
    if principal.is_superuser {
        query
    } else {
        query
            .join(JoinType::InnerJoin, crop::Relation::Field.def())
            .join(JoinType::InnerJoin, field::Relation::Farm.def())
            .filter(farm::Column::OwnerId.eq(principal.user_id))
    }
}

/// Expenses: `crop.field.farm.owner_id = principal`.
pub fn expenses(principal: &Principal) -> Select<expense::Entity> {
    let query = expense::Entity::find();
    if principal.is_superuser {
        query
    } else {
        query
            .join(JoinType::InnerJoin, expense::Relation::Crop.def())
            .join(JoinType::InnerJoin, crop::Relation::Field.def())
            .join(JoinType::InnerJoin, field::Relation::Farm.def())
            .filter(farm::Column::OwnerId.eq(principal.user_id))
    }
}

/// Outputs: `crop.field.farm.owner_id = principal`.
pub fn outputs(principal: &Principal) -> Select<output::Entity> {
    let query = output::Entity::find();
    if principal.is_superuser {
        query
    } else {
        query
            .join(JoinType::InnerJoin, output::Relation::Crop.def())
            .join(JoinType::InnerJoin, crop::Relation::Field.def())
            .join(JoinType::InnerJoin, field::Relation::Farm.def())
            .filter(farm::Column::OwnerId.eq(principal.user_id))
    }
}

/// Ledgers: one hop, `farm.owner_id = principal`.
pub fn ledgers(principal: &Principal) -> Select<ledger::Entity> {
    let query = ledger::Entity::find();
    if principal.is_superuser {
        query
    } else {
        query
            .join(JoinType::InnerJoin, ledger::Relation::Farm.def())
            .filter(farm::Column::OwnerId.eq(principal.user_id))
    }
}

/// Ledger entries: `ledger.farm.owner_id = principal`.
pub fn ledger_entries(principal: &Principal) -> Select<ledger_entry::Entity> {
    let query = ledger_entry::Entity::find();
    if principal.is_superuser {
        query
    } else {
        query
            .join(JoinType::InnerJoin, ledger_entry::Relation::Ledger.def())
            .join(JoinType::InnerJoin, ledger::Relation::Farm.def())
            .filter(farm::Column::OwnerId.eq(principal.user_id))
    }
}

/// Users: a restricted principal sees only their own row.
pub fn users(principal: &Principal) -> Select<user::Entity> {
    let query = user::Entity::find();
    if principal.is_superuser {
        query
    } else {
        query.filter(user::Column::Id.eq(principal.user_id))
    }
}
