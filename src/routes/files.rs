use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

/// Asset routes. Mounted twice by the caller: once at `/files` and once at
/// `/api/files`, the two prefixes legacy clients were written against.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::asset::list_assets).post(handlers::asset::add_asset),
        )
        .route(
            "/{value}",
            get(handlers::asset::get_asset)
                .put(handlers::asset::update_asset)
                .delete(handlers::asset::remove_asset),
        )
        .route("/{value}/detail", get(handlers::asset::asset_detail))
        .layer(handlers::asset::upload_body_limit())
}
