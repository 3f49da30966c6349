//! Storage handle used by the cleanup job.

use async_trait::async_trait;
use gamedex_core::types::DbId;
use gamedex_db::models::game::GameListFields;
use gamedex_db::repositories::GameRepo;
use gamedex_db::DbPool;
use serde_json::Value;

use crate::error::CleanupError;

/// Read and write access to the list-valued fields of stored games.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Every game's list-valued fields, ordered by id.
    async fn list_list_fields(&self) -> Result<Vec<GameListFields>, CleanupError>;

    /// Overwrite the given fields of one game in a single write.
    ///
    /// Returns `false` if the game no longer exists.
    async fn update_list_fields(
        &self,
        id: DbId,
        updates: &[(&'static str, Value)],
    ) -> Result<bool, CleanupError>;
}

/// [`GameStore`] backed by the `games` table.
pub struct PgGameStore {
    pool: DbPool,
}

impl PgGameStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn list_list_fields(&self) -> Result<Vec<GameListFields>, CleanupError> {
        Ok(GameRepo::list_list_fields(&self.pool).await?)
    }

    async fn update_list_fields(
        &self,
        id: DbId,
        updates: &[(&'static str, Value)],
    ) -> Result<bool, CleanupError> {
        Ok(GameRepo::update_list_fields(&self.pool, id, updates).await?)
    }
}
