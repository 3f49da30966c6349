//! Route definitions for the games catalog.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::games;
use crate::state::AppState;

/// Game routes mounted at `/api/games`.
///
/// ```text
/// GET    /                  -> list_games
/// POST   /                  -> create_game
/// GET    /columns           -> list_columns
/// GET    /{id}              -> get_game
/// PUT    /{id}              -> update_game
/// DELETE /{id}              -> delete_game
/// GET    /{id}/display      -> display_game
/// PATCH  /{id}/favorite     -> toggle_favorite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(games::list_games).post(games::create_game))
        .route("/columns", get(games::list_columns))
        .route(
            "/{id}",
            get(games::get_game)
                .put(games::update_game)
                .delete(games::delete_game),
        )
        .route("/{id}/display", get(games::display_game))
        .route("/{id}/favorite", patch(games::toggle_favorite))
}
