pub mod games;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /games                      list (GET), create (POST)
/// /games/columns              table column catalog (GET)
/// /games/{id}                 get, replace (PUT), delete
/// /games/{id}/display         rendered table cells (GET)
/// /games/{id}/favorite        toggle favorite (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/games", games::router())
}
