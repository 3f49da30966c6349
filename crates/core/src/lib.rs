//! Domain logic for the games catalog.
//!
//! Zero database dependencies: the list normalizer, display formatting and
//! the column catalog live here so the API, the repository layer and the
//! cleanup job all share one implementation.

pub mod display;
pub mod error;
pub mod game;
pub mod normalize;
pub mod types;
