//! The cleanup pass itself.

use gamedex_core::display::display_value;
use gamedex_core::normalize::{is_stringified_list, normalize};
use gamedex_db::models::game::GameListFields;
use serde_json::Value;

use crate::error::CleanupError;
use crate::store::GameStore;

/// Outcome of one cleanup run.
///
/// In a dry run, `updated` counts the records that would have been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub total: usize,
    pub updated: usize,
    pub already_clean: usize,
    pub failed: usize,
}

/// Rewrite every stringified list field held by `store`.
///
/// Each record gets at most one write containing only the fields that were
/// strings. A failed write is logged and counted, and the run moves on to the
/// next record. Only a failure to read the records aborts the run.
pub async fn run_cleanup<S>(store: &S, dry_run: bool) -> Result<CleanupReport, CleanupError>
where
    S: GameStore + ?Sized,
{
    let games = store.list_list_fields().await?;
    tracing::info!(count = games.len(), dry_run, "Starting list field cleanup");

    let mut report = CleanupReport {
        total: games.len(),
        ..Default::default()
    };

    for game in &games {
        let updates = stage_updates(game);
        if updates.is_empty() {
            report.already_clean += 1;
            continue;
        }

        for (field, value) in &updates {
            tracing::info!(
                id = game.id,
                name = %game.name,
                field,
                preview = %display_value(value),
                "Converting stringified list"
            );
        }

        if dry_run {
            report.updated += 1;
            continue;
        }

        match store.update_list_fields(game.id, &updates).await {
            Ok(true) => report.updated += 1,
            Ok(false) => {
                tracing::warn!(id = game.id, "Game disappeared before its update");
                report.failed += 1;
            }
            Err(e) => {
                tracing::error!(id = game.id, error = %e, "Failed to update game");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        total = report.total,
        updated = report.updated,
        already_clean = report.already_clean,
        failed = report.failed,
        dry_run,
        "Cleanup complete"
    );

    Ok(report)
}

/// Normalized values for every field of `game` still stored as a string.
fn stage_updates(game: &GameListFields) -> Vec<(&'static str, Value)> {
    game.fields()
        .into_iter()
        .filter(|(_, value)| is_stringified_list(value))
        .map(|(field, value)| (field, Value::Array(normalize(value))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gamedex_core::types::DbId;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory store that records every write.
    #[derive(Default)]
    struct RecordingStore {
        games: Vec<GameListFields>,
        failing: Vec<DbId>,
        writes: Mutex<Vec<(DbId, Vec<(&'static str, Value)>)>>,
    }

    #[async_trait]
    impl GameStore for RecordingStore {
        async fn list_list_fields(&self) -> Result<Vec<GameListFields>, CleanupError> {
            Ok(self.games.clone())
        }

        async fn update_list_fields(
            &self,
            id: DbId,
            updates: &[(&'static str, Value)],
        ) -> Result<bool, CleanupError> {
            if self.failing.contains(&id) {
                return Err(CleanupError::Store(format!("write refused for {id}")));
            }
            self.writes.lock().unwrap().push((id, updates.to_vec()));
            Ok(true)
        }
    }

    fn game(id: DbId, genres: Value, tags: Value) -> GameListFields {
        GameListFields {
            id,
            name: format!("Game {id}"),
            genres,
            categories: json!([]),
            tags,
            developers: json!([]),
            publishers: json!([]),
            supported_languages: json!([]),
            full_audio_languages: json!([]),
            screenshots: json!([]),
            movies: json!([]),
            packages: json!([]),
        }
    }

    #[tokio::test]
    async fn clean_records_are_not_written() {
        let store = RecordingStore {
            games: vec![game(1, json!(["Action"]), json!([])), game(2, json!([]), json!("FPS"))],
            ..Default::default()
        };

        let report = run_cleanup(&store, false).await.unwrap();

        assert_eq!(
            report,
            CleanupReport {
                total: 2,
                updated: 0,
                already_clean: 2,
                failed: 0,
            }
        );
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stringified_fields_are_written_once_per_record() {
        let store = RecordingStore {
            games: vec![game(1, json!("['Action', 'RPG']"), json!(" ['Indie']"))],
            ..Default::default()
        };

        let report = run_cleanup(&store, false).await.unwrap();
        assert_eq!(report.updated, 1);

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(
            writes[0],
            (
                1,
                vec![
                    ("genres", json!(["Action", "RPG"])),
                    ("tags", json!(["Indie"])),
                ]
            )
        );
    }

    #[tokio::test]
    async fn failed_write_is_counted_and_run_continues() {
        let store = RecordingStore {
            games: vec![
                game(1, json!("['A']"), json!([])),
                game(2, json!("['B']"), json!([])),
                game(3, json!([]), json!([])),
            ],
            failing: vec![1],
            ..Default::default()
        };

        let report = run_cleanup(&store, false).await.unwrap();

        assert_eq!(
            report,
            CleanupReport {
                total: 3,
                updated: 1,
                already_clean: 1,
                failed: 1,
            }
        );
        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, 2);
    }

    #[tokio::test]
    async fn dry_run_counts_without_writing() {
        let store = RecordingStore {
            games: vec![game(1, json!("['A']"), json!([]))],
            ..Default::default()
        };

        let report = run_cleanup(&store, true).await.unwrap();

        assert_eq!(report.updated, 1);
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let first = RecordingStore {
            games: vec![game(1, json!("['A', 'B']"), json!([]))],
            ..Default::default()
        };
        run_cleanup(&first, false).await.unwrap();
        let (_, updates) = first.writes.lock().unwrap()[0].clone();

        let second = RecordingStore {
            games: vec![game(1, updates[0].1.clone(), json!([]))],
            ..Default::default()
        };
        let report = run_cleanup(&second, false).await.unwrap();

        assert_eq!(report.already_clean, 1);
        assert!(second.writes.lock().unwrap().is_empty());
    }

    #[test]
    fn plain_strings_are_not_staged() {
        let staged = stage_updates(&game(1, json!("Action"), json!(null)));
        assert!(staged.is_empty());
    }
}
