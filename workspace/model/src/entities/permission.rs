use sea_orm::entity::prelude::*;

/// A view-only authorization grant for one entity type, seeded by the
/// deploy-time bootstrap. `codename` is the stable key
/// (`can_view_<entity>`); re-seeding skips existing codenames.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub codename: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
