use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Integer classifier assigned by the caller.
    pub type_id: i32,

    pub description: Option<String>,

    /// Original upload filename, unique across all assets.
    #[sea_orm(unique)]
    pub file_name: String,

    /// MIME content type served back on download.
    pub media_type: String,

    /// The file bytes themselves. Never serialized into list or detail
    /// responses; only the download path reads this column back out.
    pub content: Vec<u8>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
