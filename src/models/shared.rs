use serde::Serialize;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (zero-based).
    #[schema(example = 0)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub count: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Plain informational payload for operations whose legacy contract answers
/// with a message instead of a resource ("Delete Successful",
/// "No Data Available").
#[derive(Serialize, utoipa::ToSchema)]
pub struct StatusMessage {
    #[schema(example = "Delete Successful")]
    pub message: &'static str,
}
