use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Growing season of a crop cycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[sea_orm(string_value = "Summer")]
    Summer,
    #[sea_orm(string_value = "Winter")]
    Winter,
    #[sea_orm(string_value = "MidSeason")]
    MidSeason,
}

/// One growing cycle of a crop type on one field. This is a rollup
/// parent: its expenses and outputs are aggregated into the profit
/// figures shown in the list views.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "crops")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub field_id: i32,
    pub crop_type_id: i32,
    pub season: Season,
    pub breed: String,
    /// Acres sown for this cycle. Not checked against the field's total
    /// acreage; the original system never validated it either.
    pub total_acres: Decimal,
    pub date_sowing: Date,
    pub date_harvesting: Option<Date>,
    pub date_created: DateTimeUtc,
    pub date_modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::field::Entity",
        from = "Column::FieldId",
        to = "super::field::Column::Id"
    )]
    Field,
    #[sea_orm(
        belongs_to = "super::crop_type::Entity",
        from = "Column::CropTypeId",
        to = "super::crop_type::Column::Id"
    )]
    CropType,
    #[sea_orm(has_many = "super::expense::Entity")]
    Expense,
    #[sea_orm(has_many = "super::output::Entity")]
    Output,
}

impl Related<super::field::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Field.def()
    }
}

impl Related<super::crop_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CropType.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl Related<super::output::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Output.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
