//! Runs the cleanup job against a real database.

use gamedex_cleanup::{run_cleanup, CleanupReport, PgGameStore};
use gamedex_db::repositories::GameRepo;
use serde_json::{json, Value};
use sqlx::PgPool;

async fn insert_raw(pool: &PgPool, appid: i64, genres: Value, movies: Value) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO games (appid, name, genres, movies) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(appid)
    .bind(format!("Game {appid}"))
    .bind(genres)
    .bind(movies)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rewrites_legacy_rows_and_is_idempotent(pool: PgPool) {
    let legacy = insert_raw(
        &pool,
        1,
        json!("['Action', 'Indie']"),
        json!(r#"["Trailer, part 1", 'Teaser']"#),
    )
    .await;
    let clean = insert_raw(&pool, 2, json!(["RPG"]), json!([])).await;

    let store = PgGameStore::new(pool.clone());
    let report = run_cleanup(&store, false).await.unwrap();
    assert_eq!(
        report,
        CleanupReport {
            total: 2,
            updated: 1,
            already_clean: 1,
            failed: 0,
        }
    );

    let game = GameRepo::find_by_id(&pool, legacy).await.unwrap().unwrap();
    assert_eq!(game.genres, json!(["Action", "Indie"]));
    assert_eq!(game.movies, json!(["Trailer, part 1", "Teaser"]));

    let untouched = GameRepo::find_by_id(&pool, clean).await.unwrap().unwrap();
    assert_eq!(untouched.genres, json!(["RPG"]));

    let again = run_cleanup(&store, false).await.unwrap();
    assert_eq!(again.updated, 0);
    assert_eq!(again.already_clean, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dry_run_leaves_rows_unchanged(pool: PgPool) {
    let id = insert_raw(&pool, 1, json!("['Action']"), json!([])).await;

    let report = run_cleanup(&PgGameStore::new(pool.clone()), true)
        .await
        .unwrap();
    assert_eq!(report.updated, 1);

    let game = GameRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(game.genres, json!("['Action']"));
}
