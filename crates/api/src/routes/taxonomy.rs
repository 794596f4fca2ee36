//! Route definitions for `/categories` and `/genres`.

use axum::routing::get;
use axum::Router;

use crate::handlers::taxonomy;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /          -> list_categories
/// POST   /          -> create_category (admin)
/// DELETE /{slug}    -> delete_category (admin)
/// GET    /{slug}    -> 405
/// PUT    /{slug}    -> 405 (admin)
/// PATCH  /{slug}    -> 405 (admin)
/// ```
pub fn categories_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(taxonomy::list_categories).post(taxonomy::create_category),
        )
        .route(
            "/{slug}",
            get(taxonomy::retrieve_not_allowed)
                .put(taxonomy::update_not_allowed)
                .patch(taxonomy::update_not_allowed)
                .delete(taxonomy::delete_category),
        )
}

/// Routes mounted at `/genres`. Same shape as [`categories_router`].
pub fn genres_router() -> Router<AppState> {
    Router::new()
        .route("/", get(taxonomy::list_genres).post(taxonomy::create_genre))
        .route(
            "/{slug}",
            get(taxonomy::retrieve_not_allowed)
                .put(taxonomy::update_not_allowed)
                .patch(taxonomy::update_not_allowed)
                .delete(taxonomy::delete_genre),
        )
}
