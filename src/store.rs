//! Thin persistence boundary over the `asset` table. Handlers and tests
//! resolve assets through here; everything else is plain sea-orm entity
//! operations at the call site.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entity::content::asset;

/// Resolve an asset by route identifier: tried as a numeric id first, and on
/// parse failure matched against `file_name`.
pub async fn find_by_id_or_name<C: ConnectionTrait>(
    db: &C,
    value: &str,
) -> Result<Option<asset::Model>, DbErr> {
    match value.parse::<i32>() {
        Ok(id) => asset::Entity::find_by_id(id).one(db).await,
        Err(_) => {
            asset::Entity::find()
                .filter(asset::Column::FileName.eq(value))
                .one(db)
                .await
        }
    }
}

/// Whether any asset already uses the given filename.
pub async fn name_taken<C: ConnectionTrait>(db: &C, file_name: &str) -> Result<bool, DbErr> {
    let count = asset::Entity::find()
        .filter(asset::Column::FileName.eq(file_name))
        .count(db)
        .await?;
    Ok(count > 0)
}
