//! Deploy-time seeding of the view-only permissions.
//!
//! One `can_view_<entity>` row per registered entity type, created only
//! if the codename is not already present, so re-running the bootstrap
//! on every deployment never produces duplicates.

use model::entities::permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use tracing::{debug, info};

/// Every entity type that gets a seeded view permission, as
/// `(codename suffix, display name)`.
pub const VIEW_PERMISSION_ENTITIES: &[(&str, &str)] = &[
    ("user", "User"),
    ("farm", "Farm"),
    ("farmasset", "Farm Asset"),
    ("field", "Field"),
    ("croptype", "Crop Type"),
    ("crop", "Crop"),
    ("expense", "Expense"),
    ("output", "Output"),
    ("ledger", "Ledger"),
    ("ledgerentry", "Ledger Entry"),
];

/// Ensure a `can_view_*` permission exists for every registered entity
/// type. Idempotent: existing codenames are skipped.
pub async fn ensure_view_permissions<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let mut created = 0;
    for (entity, display) in VIEW_PERMISSION_ENTITIES {
        let codename = format!("can_view_{entity}");

        let exists = permission::Entity::find()
            .filter(permission::Column::Codename.eq(codename.as_str()))
            .one(db)
            .await?
            .is_some();
        if exists {
            debug!("Permission {} already present, skipping", codename);
            continue;
        }

        permission::ActiveModel {
            codename: Set(codename.clone()),
            name: Set(format!("Can View {display}")),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created += 1;
        debug!("Created permission {}", codename);
    }

    info!(
        "View permission bootstrap complete ({} created, {} total)",
        created,
        VIEW_PERMISSION_ENTITIES.len()
    );
    Ok(())
}
