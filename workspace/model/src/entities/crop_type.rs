use sea_orm::entity::prelude::*;

use super::user::Language;

/// Catalog of crop kinds (wheat, rice, sugarcane, ...). Global reference
/// data: not owned by any farm and visible to every principal. Carries
/// Urdu translation columns alongside the English ones.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "crop_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub name_ur: Option<String>,
    pub description: Option<String>,
    pub description_ur: Option<String>,
    pub date_created: DateTimeUtc,
    pub date_modified: DateTimeUtc,
}

impl Model {
    /// Resolve the display name for the given language, falling back to
    /// the English column when no translation is recorded.
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::Ur => self.name_ur.as_deref().unwrap_or(&self.name),
            Language::En => &self.name,
        }
    }

    pub fn display_description(&self, language: Language) -> Option<&str> {
        match language {
            Language::Ur => self
                .description_ur
                .as_deref()
                .or(self.description.as_deref()),
            Language::En => self.description.as_deref(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::crop::Entity")]
    Crop,
}

impl Related<super::crop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
