use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What the money was spent on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    #[sea_orm(string_value = "Seed")]
    Seed,
    #[sea_orm(string_value = "Fertilizer")]
    Fertilizer,
    #[sea_orm(string_value = "Pesticides")]
    Pesticides,
    #[sea_orm(string_value = "Water")]
    Water,
    #[sea_orm(string_value = "Electricity")]
    Electricity,
    #[sea_orm(string_value = "Oil")]
    Oil,
    #[sea_orm(string_value = "Labour")]
    Labour,
    #[sea_orm(string_value = "Lease")]
    Lease,
    #[sea_orm(string_value = "Miscellaneous")]
    Miscellaneous,
}

/// Money spent on a crop cycle. `spent_by` is who handed over the cash,
/// `added_by` is who recorded the row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub crop_id: i32,
    pub expense_type: ExpenseType,
    pub expense_date: Date,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub spent_by_id: i32,
    pub added_by_id: i32,
    pub date_created: DateTimeUtc,
    pub date_modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::crop::Entity",
        from = "Column::CropId",
        to = "super::crop::Column::Id"
    )]
    Crop,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SpentById",
        to = "super::user::Column::Id"
    )]
    SpentBy,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AddedById",
        to = "super::user::Column::Id"
    )]
    AddedBy,
}

impl Related<super::crop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
