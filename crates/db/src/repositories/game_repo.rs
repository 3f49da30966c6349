//! Repository for the `games` table.
//!
//! Provides listing with search/sort/pagination, CRUD, the favorite toggle,
//! and the raw list-field access used by the cleanup job.

use gamedex_core::game::FieldRef;
use gamedex_core::types::DbId;
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::PgPool;

use crate::models::game::{Game, GameFilter, GameInput, GameListFields, GameSort};

/// Column list for `games` queries.
const GAME_COLUMNS: &str = "\
    id, appid, name, release_date, required_age, price, dlc_count, \
    detailed_description, about_the_game, short_description, reviews, \
    header_image, website, support_url, support_email, \
    windows, mac, linux, metacritic_score, metacritic_url, \
    achievements, recommendations, notes, \
    supported_languages, full_audio_languages, packages, developers, \
    publishers, categories, genres, screenshots, movies, \
    user_score, score_rank, positive, negative, estimated_owners, \
    average_playtime_forever, average_playtime_2weeks, \
    median_playtime_forever, median_playtime_2weeks, \
    discount, peak_ccu, tags, pct_pos_total, num_reviews_total, \
    pct_pos_recent, num_reviews_recent, is_favorite, created_at, updated_at";

/// Columns written by create/update, in the order [`bind_input`] binds them.
const WRITE_COLUMNS: &[&str] = &[
    "appid",
    "name",
    "release_date",
    "required_age",
    "price",
    "dlc_count",
    "detailed_description",
    "about_the_game",
    "short_description",
    "reviews",
    "header_image",
    "website",
    "support_url",
    "support_email",
    "windows",
    "mac",
    "linux",
    "metacritic_score",
    "metacritic_url",
    "achievements",
    "recommendations",
    "notes",
    "supported_languages",
    "full_audio_languages",
    "packages",
    "developers",
    "publishers",
    "categories",
    "genres",
    "screenshots",
    "movies",
    "user_score",
    "score_rank",
    "positive",
    "negative",
    "estimated_owners",
    "average_playtime_forever",
    "average_playtime_2weeks",
    "median_playtime_forever",
    "median_playtime_2weeks",
    "discount",
    "peak_ccu",
    "tags",
    "pct_pos_total",
    "num_reviews_total",
    "pct_pos_recent",
    "num_reviews_recent",
    "is_favorite",
];

/// Column list for the cleanup job's scan.
const LIST_FIELD_COLUMNS: &str = "\
    id, name, genres, categories, tags, developers, publishers, \
    supported_languages, full_audio_languages, screenshots, movies, packages";

/// Provides CRUD and listing operations for games.
pub struct GameRepo;

impl GameRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a new game, returning the created row.
    ///
    /// The caller validates and normalizes `input` first.
    pub async fn create(pool: &PgPool, input: &GameInput) -> Result<Game, sqlx::Error> {
        let placeholders: Vec<String> = (1..=WRITE_COLUMNS.len()).map(|i| format!("${i}")).collect();
        let query = format!(
            "INSERT INTO games ({columns}) VALUES ({values}) RETURNING {GAME_COLUMNS}",
            columns = WRITE_COLUMNS.join(", "),
            values = placeholders.join(", "),
        );
        bind_input(sqlx::query_as::<_, Game>(&query), input)
            .fetch_one(pool)
            .await
    }

    /// Find a game by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Game>, sqlx::Error> {
        let query = format!("SELECT {GAME_COLUMNS} FROM games WHERE id = $1");
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace every editable field of a game.
    ///
    /// Returns `None` if no game with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &GameInput,
    ) -> Result<Option<Game>, sqlx::Error> {
        let assignments: Vec<String> = WRITE_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ${}", i + 2))
            .collect();
        let query = format!(
            "UPDATE games SET {assignments}, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {GAME_COLUMNS}",
            assignments = assignments.join(", "),
        );
        bind_input(sqlx::query_as::<_, Game>(&query).bind(id), input)
            .fetch_optional(pool)
            .await
    }

    /// Delete a game by ID, returning the deleted row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Game>, sqlx::Error> {
        let query = format!("DELETE FROM games WHERE id = $1 RETURNING {GAME_COLUMNS}");
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_favorite` in a single statement.
    ///
    /// Returns `None` if no game with the given ID exists.
    pub async fn toggle_favorite(pool: &PgPool, id: DbId) -> Result<Option<Game>, sqlx::Error> {
        let query = format!(
            "UPDATE games SET is_favorite = NOT is_favorite, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {GAME_COLUMNS}"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    /// List one page of games matching `filter`, ordered by `sort` then `id`.
    pub async fn list(
        pool: &PgPool,
        filter: &GameFilter,
        sort: GameSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Game>, sqlx::Error> {
        let (where_clause, bind_idx) = filter_sql(filter);
        let query = format!(
            "SELECT {GAME_COLUMNS} FROM games \
             {where_clause} \
             ORDER BY {sort_col} {direction}, id ASC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            sort_col = sort.field.column(),
            direction = sort.order.as_sql(),
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Game>(&query);
        if let Some(search) = &filter.search {
            q = q.bind(&search.term);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count games matching `filter`.
    pub async fn count(pool: &PgPool, filter: &GameFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = filter_sql(filter);
        let query = format!("SELECT COUNT(*) FROM games {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(search) = &filter.search {
            q = q.bind(&search.term);
        }
        q.fetch_one(pool).await
    }

    // -----------------------------------------------------------------------
    // Cleanup support
    // -----------------------------------------------------------------------

    /// Read the list-valued columns of every game, ordered by ID.
    pub async fn list_list_fields(pool: &PgPool) -> Result<Vec<GameListFields>, sqlx::Error> {
        let query = format!("SELECT {LIST_FIELD_COLUMNS} FROM games ORDER BY id");
        sqlx::query_as::<_, GameListFields>(&query)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the given list-valued columns of one game.
    ///
    /// Columns not in `LIST_FIELDS` are rejected with `ColumnNotFound`.
    /// Returns `true` if a row was updated.
    pub async fn update_list_fields(
        pool: &PgPool,
        id: DbId,
        updates: &[(&str, Value)],
    ) -> Result<bool, sqlx::Error> {
        if updates.is_empty() {
            return Ok(false);
        }

        let mut assignments = Vec::with_capacity(updates.len());
        for (i, (field, _)) in updates.iter().enumerate() {
            match gamedex_core::game::resolve_field(field) {
                Some(FieldRef::List(col)) => assignments.push(format!("{col} = ${}", i + 2)),
                _ => return Err(sqlx::Error::ColumnNotFound(field.to_string())),
            }
        }

        let query = format!(
            "UPDATE games SET {assignments}, updated_at = NOW() WHERE id = $1",
            assignments = assignments.join(", "),
        );
        let mut q = sqlx::query(&query).bind(id);
        for (_, value) in updates {
            q = q.bind(value);
        }
        let result = q.execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build the `WHERE` clause for `filter`.
///
/// Returns the clause and the index of the next free bind parameter. The
/// search term, when present, is always `$1`.
fn filter_sql(filter: &GameFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.favorites_only {
        conditions.push("is_favorite = TRUE".to_string());
    }
    if let Some(search) = &filter.search {
        let condition = match search.field {
            // Legacy string values are searched as a one-element list.
            FieldRef::List(col) => format!(
                "EXISTS (\
                    SELECT 1 FROM jsonb_array_elements_text(\
                        CASE jsonb_typeof({col}) \
                            WHEN 'array' THEN {col} \
                            WHEN 'string' THEN jsonb_build_array({col}) \
                            ELSE '[]'::jsonb \
                        END\
                    ) AS elem \
                    WHERE strpos(lower(elem), lower(${bind_idx})) > 0\
                 )"
            ),
            FieldRef::Scalar(col) => {
                format!("strpos(lower({col}::text), lower(${bind_idx})) > 0")
            }
        };
        conditions.push(condition);
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, bind_idx)
}

/// Bind every [`WRITE_COLUMNS`] value of `input`, in order.
fn bind_input<'q>(
    q: QueryAs<'q, Postgres, Game, PgArguments>,
    input: &'q GameInput,
) -> QueryAs<'q, Postgres, Game, PgArguments> {
    q.bind(input.appid)
        .bind(input.name.as_deref())
        .bind(input.release_date)
        .bind(input.required_age)
        .bind(input.price)
        .bind(input.dlc_count)
        .bind(input.detailed_description.as_deref())
        .bind(input.about_the_game.as_deref())
        .bind(input.short_description.as_deref())
        .bind(input.reviews.as_deref())
        .bind(input.header_image.as_deref())
        .bind(input.website.as_deref())
        .bind(input.support_url.as_deref())
        .bind(input.support_email.as_deref())
        .bind(input.windows)
        .bind(input.mac)
        .bind(input.linux)
        .bind(input.metacritic_score)
        .bind(input.metacritic_url.as_deref())
        .bind(input.achievements)
        .bind(input.recommendations)
        .bind(input.notes.as_deref())
        .bind(&input.supported_languages)
        .bind(&input.full_audio_languages)
        .bind(&input.packages)
        .bind(&input.developers)
        .bind(&input.publishers)
        .bind(&input.categories)
        .bind(&input.genres)
        .bind(&input.screenshots)
        .bind(&input.movies)
        .bind(input.user_score)
        .bind(input.score_rank.as_deref())
        .bind(input.positive)
        .bind(input.negative)
        .bind(input.estimated_owners.as_deref())
        .bind(input.average_playtime_forever)
        .bind(input.average_playtime_2weeks)
        .bind(input.median_playtime_forever)
        .bind(input.median_playtime_2weeks)
        .bind(input.discount)
        .bind(input.peak_ccu)
        .bind(&input.tags)
        .bind(input.pct_pos_total)
        .bind(input.num_reviews_total)
        .bind(input.pct_pos_recent)
        .bind(input.num_reviews_recent)
        .bind(input.is_favorite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::SearchFilter;

    #[test]
    fn write_columns_cover_game_columns() {
        for col in WRITE_COLUMNS {
            assert!(GAME_COLUMNS.contains(col), "{col} missing from GAME_COLUMNS");
        }
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, next) = filter_sql(&GameFilter::default());
        assert!(clause.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn favorites_and_search_are_combined() {
        let filter = GameFilter {
            favorites_only: true,
            search: Some(SearchFilter {
                field: FieldRef::List("genres"),
                term: "rpg".into(),
            }),
        };
        let (clause, next) = filter_sql(&filter);
        assert!(clause.starts_with("WHERE is_favorite = TRUE AND EXISTS"));
        assert!(clause.contains("jsonb_typeof(genres)"));
        assert!(clause.contains("lower($1)"));
        assert_eq!(next, 2);
    }

    #[test]
    fn scalar_search_casts_to_text() {
        let filter = GameFilter {
            favorites_only: false,
            search: Some(SearchFilter {
                field: FieldRef::Scalar("price"),
                term: "9".into(),
            }),
        };
        let (clause, _) = filter_sql(&filter);
        assert_eq!(clause, "WHERE strpos(lower(price::text), lower($1)) > 0");
    }
}
