//! Idempotent seeding of the lookup tables.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use common::AppResult;
use domain::{PRODUCT_TYPE_SEED, ROLE_SEED, STATUS_SEED};

use crate::repository::entities::{product_type, role, status};

/// Rows written by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub renamed: usize,
}

/// Upsert `(code, name)` rows into one lookup entity module.
macro_rules! upsert_lookup {
    ($db:expr, $module:ident, $rows:expr, $report:expr) => {
        for (code, name) in $rows.iter() {
            let existing = $module::Entity::find()
                .filter($module::Column::Code.eq(*code))
                .one($db)
                .await?;

            match existing {
                None => {
                    $module::ActiveModel {
                        code: Set(code.to_string()),
                        name: Set(name.to_string()),
                        ..Default::default()
                    }
                    .insert($db)
                    .await?;
                    $report.created += 1;
                }
                Some(model) if model.name != *name => {
                    let mut active: $module::ActiveModel = model.into();
                    active.name = Set(name.to_string());
                    active.update($db).await?;
                    $report.renamed += 1;
                }
                Some(_) => {}
            }
        }
    };
}

/// Seed roles, statuses and product types. Safe to run repeatedly.
pub async fn seed_lookup_tables<C: ConnectionTrait>(db: &C) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    upsert_lookup!(db, role, ROLE_SEED, report);
    upsert_lookup!(db, status, STATUS_SEED, report);
    upsert_lookup!(db, product_type, PRODUCT_TYPE_SEED, report);

    tracing::info!(
        created = report.created,
        renamed = report.renamed,
        "Lookup tables seeded"
    );
    Ok(report)
}
