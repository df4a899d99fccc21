use sea_orm::entity::prelude::*;

/// One sale of harvested produce from a crop cycle. Revenue for the
/// event is `total_mann * rate_per_mann`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "outputs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub crop_id: i32,
    /// Weight sold, in mann.
    pub total_mann: Decimal,
    /// Price per mann.
    pub rate_per_mann: i32,
    pub sold_date: Date,
    pub notes: Option<String>,
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
}

impl Related<super::crop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
