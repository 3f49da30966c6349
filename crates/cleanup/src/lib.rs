//! One-time rewrite of stringified list fields into real JSON arrays.
//!
//! The job walks every stored game, parses list-valued fields that were
//! saved as strings, and writes back only the fields it changed. Records
//! that already hold arrays are left alone, so running it twice is a no-op.

pub mod error;
pub mod job;
pub mod store;

pub use error::CleanupError;
pub use job::{run_cleanup, CleanupReport};
pub use store::{GameStore, PgGameStore};
