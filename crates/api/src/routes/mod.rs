pub mod auth;
pub mod health;
pub mod taxonomy;
pub mod titles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Mount point of [`api_routes`].
pub const API_PREFIX: &str = "/api/v1";

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                          register, email a code (public)
/// /auth/token                                           exchange code for a token (public)
///
/// /users                                                list, create (admin only)
/// /users/me                                             own profile (auth required)
/// /users/{username}                                     get, update, delete (admin only)
///
/// /categories                                           list, create
/// /categories/{slug}                                    delete (GET/PUT/PATCH -> 405)
/// /genres                                               list, create
/// /genres/{slug}                                        delete (GET/PUT/PATCH -> 405)
///
/// /titles                                               list, create
/// /titles/{title_id}                                    get, update, delete
/// /titles/{title_id}/reviews                            list, create
/// /titles/{title_id}/reviews/{review_id}                get, update, delete
/// /titles/{title_id}/reviews/{review_id}/comments       list, create
/// /titles/{title_id}/reviews/{review_id}/comments/{id}  get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Signup and token issuance.
        .nest("/auth", auth::router())
        // User administration and own profile.
        .nest("/users", users::router())
        // Catalogue classification.
        .nest("/categories", taxonomy::categories_router())
        .nest("/genres", taxonomy::genres_router())
        // Titles with nested reviews and comments.
        .nest("/titles", titles::router())
}
