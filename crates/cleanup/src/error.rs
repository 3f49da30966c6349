/// Errors raised by a [`GameStore`](crate::store::GameStore) during cleanup.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Store(String),
}
