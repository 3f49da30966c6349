//! Handlers for the `/api/games` resource.
//!
//! Listing with search/sort/pagination, CRUD, the favorite toggle, and the
//! read-only display endpoints used by the table UI.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gamedex_core::display::render_cell;
use gamedex_core::error::CoreError;
use gamedex_core::game::{
    page_offset, resolve_field, total_pages, Column, MAX_PAGE_LIMIT, TABLE_COLUMNS,
};
use gamedex_core::types::DbId;
use gamedex_db::models::game::{Game, GameFilter, GameInput, GameSort, SearchFilter};
use gamedex_db::repositories::GameRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::GameListParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Response body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    #[serde(rename = "deletedGame")]
    pub deleted_game: Game,
}

/// One rendered table cell.
#[derive(Debug, Serialize)]
pub struct DisplayCell {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// A game rendered as table cells, in column order.
#[derive(Debug, Serialize)]
pub struct GameDisplay {
    pub id: DbId,
    pub cells: Vec<DisplayCell>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/games
///
/// One page of games with optional favorites filter, column search and sort.
pub async fn list_games(
    State(state): State<AppState>,
    params: Result<Query<GameListParams>, QueryRejection>,
) -> AppResult<Json<PageResponse<Game>>> {
    let Query(params) = params?;
    let (filter, sort, limit) = resolve_listing(&params)?;
    let offset = page_offset(params.page, limit);

    let games = GameRepo::list(&state.pool, &filter, sort, limit, offset).await?;
    let total_results = GameRepo::count(&state.pool, &filter).await?;

    Ok(Json(PageResponse {
        page: params.page,
        limit,
        total_results,
        total_pages: total_pages(total_results, limit),
        data: games,
    }))
}

/// GET /api/games/columns
///
/// The table's column catalog: keys, labels, render kind, and which columns
/// accept `sortBy` / `searchField`.
pub async fn list_columns() -> Json<DataResponse<&'static [Column]>> {
    Json(DataResponse {
        data: TABLE_COLUMNS,
    })
}

// ---------------------------------------------------------------------------
// Single game
// ---------------------------------------------------------------------------

/// GET /api/games/{id}
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Game>> {
    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(game_not_found(id))?;
    Ok(Json(game))
}

/// GET /api/games/{id}/display
///
/// Render every table column of one game as display text.
pub async fn display_game(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<GameDisplay>> {
    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(game_not_found(id))?;

    let record = serde_json::to_value(&game)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize game: {e}")))?;
    let cells = TABLE_COLUMNS
        .iter()
        .map(|column| DisplayCell {
            key: column.key,
            label: column.label,
            value: render_cell(column, &record),
        })
        .collect();

    Ok(Json(GameDisplay { id, cells }))
}

/// POST /api/games
///
/// Create a game. List fields are normalized before insert.
pub async fn create_game(
    State(state): State<AppState>,
    Json(input): Json<GameInput>,
) -> AppResult<(StatusCode, Json<Game>)> {
    input.validate()?;
    let input = input.normalize_lists();

    let game = GameRepo::create(&state.pool, &input).await?;
    tracing::info!(id = game.id, appid = game.appid, "Game created");

    Ok((StatusCode::CREATED, Json(game)))
}

/// PUT /api/games/{id}
///
/// Replace every editable field of a game.
pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<GameInput>,
) -> AppResult<Json<Game>> {
    input.validate()?;
    let input = input.normalize_lists();

    let game = GameRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(game_not_found(id))?;
    tracing::info!(id, "Game updated");

    Ok(Json(game))
}

/// DELETE /api/games/{id}
///
/// Delete a game and return the deleted snapshot.
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteResponse>> {
    tracing::debug!(id, "Delete request received");

    let Some(game) = GameRepo::delete(&state.pool, id).await? else {
        tracing::info!(id, "Delete requested for missing game");
        return Err(game_not_found(id));
    };
    tracing::info!(id, name = %game.name, "Game deleted");

    Ok(Json(DeleteResponse {
        message: "Game deleted successfully",
        deleted_game: game,
    }))
}

/// PATCH /api/games/{id}/favorite
///
/// Flip the favorite flag and return the updated game.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Game>> {
    let game = GameRepo::toggle_favorite(&state.pool, id)
        .await?
        .ok_or(game_not_found(id))?;
    tracing::debug!(id, is_favorite = game.is_favorite, "Favorite toggled");

    Ok(Json(game))
}

// ── Private helpers ──────────────────────────────────────────────────────

fn game_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Game", id })
}

/// Turn raw listing parameters into a filter, a sort and an effective limit.
///
/// Field names are resolved against the column allowlist; anything unknown
/// is a client error.
fn resolve_listing(params: &GameListParams) -> AppResult<(GameFilter, GameSort, i64)> {
    if params.page < 1 {
        return Err(AppError::BadRequest("page must be at least 1".into()));
    }
    if params.limit < 1 {
        return Err(AppError::BadRequest("limit must be at least 1".into()));
    }
    let limit = params.limit.min(MAX_PAGE_LIMIT);

    let sort_field = resolve_field(&params.sort_by)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown sort field: {}", params.sort_by)))?;

    let search = if params.search_term.is_empty() || params.search_field.is_empty() {
        None
    } else {
        let field = resolve_field(&params.search_field).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown search field: {}", params.search_field))
        })?;
        Some(SearchFilter {
            field,
            term: params.search_term.clone(),
        })
    };

    Ok((
        GameFilter {
            favorites_only: params.show_only_favorites,
            search,
        },
        GameSort {
            field: sort_field,
            order: params.order,
        },
        limit,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use gamedex_core::game::{FieldRef, SortOrder};

    #[test]
    fn defaults_sort_by_name_without_search() {
        let (filter, sort, limit) = resolve_listing(&GameListParams::default()).unwrap();
        assert!(!filter.favorites_only);
        assert!(filter.search.is_none());
        assert_eq!(sort.field, FieldRef::Scalar("name"));
        assert_eq!(sort.order, SortOrder::Asc);
        assert_eq!(limit, 20);
    }

    #[test]
    fn search_on_list_field() {
        let params = GameListParams {
            search_field: "genres".into(),
            search_term: "rpg".into(),
            ..Default::default()
        };
        let (filter, _, _) = resolve_listing(&params).unwrap();
        let search = filter.search.unwrap();
        assert_eq!(search.field, FieldRef::List("genres"));
        assert_eq!(search.term, "rpg");
    }

    #[test]
    fn unknown_fields_are_bad_requests() {
        let params = GameListParams {
            sort_by: "nope".into(),
            ..Default::default()
        };
        assert_matches!(resolve_listing(&params), Err(AppError::BadRequest(_)));

        let params = GameListParams {
            search_field: "nope".into(),
            search_term: "x".into(),
            ..Default::default()
        };
        assert_matches!(resolve_listing(&params), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn unknown_search_field_is_ignored_without_term() {
        let params = GameListParams {
            search_field: "nope".into(),
            ..Default::default()
        };
        assert!(resolve_listing(&params).unwrap().0.search.is_none());
    }

    #[test]
    fn limit_is_clamped_and_page_validated() {
        let params = GameListParams {
            limit: 10_000,
            ..Default::default()
        };
        assert_eq!(resolve_listing(&params).unwrap().2, MAX_PAGE_LIMIT);

        let params = GameListParams {
            page: 0,
            ..Default::default()
        };
        assert_matches!(resolve_listing(&params), Err(AppError::BadRequest(_)));
    }
}
