use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::entity::content::asset;
use crate::models::shared::Pagination;

/// Query parameters for listing assets.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct AssetListQuery {
    /// Zero-based page number (default 0).
    pub page: Option<u64>,
    /// Page size (default 20, max 100).
    pub count: Option<u64>,
}

/// Projected list row. Content is never selected for list queries.
#[derive(FromQueryResult, Serialize, utoipa::ToSchema)]
pub struct AssetSummary {
    /// Asset ID.
    #[schema(example = 42)]
    pub id: i32,
    /// Integer type classifier.
    #[schema(example = 1)]
    pub type_id: i32,
    /// Free-text description.
    #[schema(example = "Site logo")]
    pub description: Option<String>,
    /// MIME content type.
    #[schema(example = "image/png")]
    pub media_type: String,
    /// Unique filename.
    #[schema(example = "logo.png")]
    pub file_name: String,
}

/// Response DTO for a paginated asset list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AssetListResponse {
    pub data: Vec<AssetSummary>,
    pub pagination: Pagination,
}

/// Full metadata record for a single asset. The blob itself is only ever
/// returned by the download endpoint, so this DTO carries no content field.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AssetResponse {
    /// Asset ID.
    #[schema(example = 42)]
    pub id: i32,
    /// Integer type classifier.
    #[schema(example = 1)]
    pub type_id: i32,
    /// Free-text description.
    #[schema(example = "Site logo")]
    pub description: Option<String>,
    /// Unique filename.
    #[schema(example = "logo.png")]
    pub file_name: String,
    /// MIME content type.
    #[schema(example = "image/png")]
    pub media_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<asset::Model> for AssetResponse {
    fn from(model: asset::Model) -> Self {
        Self {
            id: model.id,
            type_id: model.type_id,
            description: model.description,
            file_name: model.file_name,
            media_type: model.media_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
