use sea_orm::entity::prelude::*;

/// A piece of land belonging to a farm, either owned outright or leased
/// from a landlord. The landlord/lease columns are only meaningful when
/// `is_own_property` is false.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fields")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farm_id: i32,
    pub name: String,
    pub location: Option<String>,
    pub is_own_property: bool,
    pub has_electricity_tubewell: bool,
    pub has_canal_irrigation: bool,
    pub total_acres: Decimal,
    pub landlord_name: Option<String>,
    pub landlord_number: Option<String>,
    /// If leased, the per-acre rate.
    pub lease_per_acre: Option<Decimal>,
    pub lease_start: Option<Date>,
    pub lease_end: Option<Date>,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub date_created: DateTimeUtc,
    pub date_modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farm::Entity",
        from = "Column::FarmId",
        to = "super::farm::Column::Id"
    )]
    Farm,
    #[sea_orm(has_many = "super::crop::Entity")]
    Crop,
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl Related<super::crop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
