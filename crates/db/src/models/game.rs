//! Game record model, write DTO and listing query types.

use chrono::NaiveDate;
use gamedex_core::game::{FieldRef, SortOrder};
use gamedex_core::normalize::normalize;
use gamedex_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `games` table.
///
/// List-valued fields are raw JSON: arrays once clean, possibly strings on
/// rows the cleanup job has not visited yet.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Game {
    pub id: DbId,
    pub appid: i64,
    pub name: String,
    pub release_date: Option<NaiveDate>,
    pub required_age: i64,
    pub price: f64,
    pub dlc_count: i64,
    pub detailed_description: Option<String>,
    pub about_the_game: Option<String>,
    pub short_description: Option<String>,
    pub reviews: Option<String>,
    pub header_image: Option<String>,
    pub website: Option<String>,
    pub support_url: Option<String>,
    pub support_email: Option<String>,
    pub windows: bool,
    pub mac: bool,
    pub linux: bool,
    pub metacritic_score: i64,
    pub metacritic_url: Option<String>,
    pub achievements: i64,
    pub recommendations: i64,
    pub notes: Option<String>,
    pub supported_languages: Value,
    pub full_audio_languages: Value,
    pub packages: Value,
    pub developers: Value,
    pub publishers: Value,
    pub categories: Value,
    pub genres: Value,
    pub screenshots: Value,
    pub movies: Value,
    pub user_score: f64,
    pub score_rank: Option<String>,
    pub positive: i64,
    pub negative: i64,
    pub estimated_owners: Option<String>,
    pub average_playtime_forever: i64,
    pub average_playtime_2weeks: i64,
    pub median_playtime_forever: i64,
    pub median_playtime_2weeks: i64,
    pub discount: f64,
    pub peak_ccu: i64,
    pub tags: Value,
    pub pct_pos_total: f64,
    pub num_reviews_total: i64,
    pub pct_pos_recent: f64,
    pub num_reviews_recent: i64,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The list-valued columns of one game, as read by the cleanup job.
#[derive(Debug, Clone, FromRow)]
pub struct GameListFields {
    pub id: DbId,
    pub name: String,
    pub genres: Value,
    pub categories: Value,
    pub tags: Value,
    pub developers: Value,
    pub publishers: Value,
    pub supported_languages: Value,
    pub full_audio_languages: Value,
    pub screenshots: Value,
    pub movies: Value,
    pub packages: Value,
}

impl GameListFields {
    /// Field name / stored value pairs, in `LIST_FIELDS` order.
    pub fn fields(&self) -> [(&'static str, &Value); 10] {
        [
            ("genres", &self.genres),
            ("categories", &self.categories),
            ("tags", &self.tags),
            ("developers", &self.developers),
            ("publishers", &self.publishers),
            ("supported_languages", &self.supported_languages),
            ("full_audio_languages", &self.full_audio_languages),
            ("screenshots", &self.screenshots),
            ("movies", &self.movies),
            ("packages", &self.packages),
        ]
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a game or replacing an existing one.
///
/// Unknown keys (`id`, timestamps echoed back by the edit form) are ignored.
/// Omitted numbers default to 0 and omitted lists to `[]`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GameInput {
    #[validate(required(message = "appid is required"))]
    pub appid: Option<i64>,
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub required_age: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub dlc_count: i64,
    pub detailed_description: Option<String>,
    pub about_the_game: Option<String>,
    pub short_description: Option<String>,
    pub reviews: Option<String>,
    pub header_image: Option<String>,
    pub website: Option<String>,
    pub support_url: Option<String>,
    pub support_email: Option<String>,
    #[serde(default)]
    pub windows: bool,
    #[serde(default)]
    pub mac: bool,
    #[serde(default)]
    pub linux: bool,
    #[serde(default)]
    pub metacritic_score: i64,
    pub metacritic_url: Option<String>,
    #[serde(default)]
    pub achievements: i64,
    #[serde(default)]
    pub recommendations: i64,
    pub notes: Option<String>,
    #[serde(default)]
    pub supported_languages: Value,
    #[serde(default)]
    pub full_audio_languages: Value,
    #[serde(default)]
    pub packages: Value,
    #[serde(default)]
    pub developers: Value,
    #[serde(default)]
    pub publishers: Value,
    #[serde(default)]
    pub categories: Value,
    #[serde(default)]
    pub genres: Value,
    #[serde(default)]
    pub screenshots: Value,
    #[serde(default)]
    pub movies: Value,
    #[serde(default)]
    pub user_score: f64,
    pub score_rank: Option<String>,
    #[serde(default)]
    pub positive: i64,
    #[serde(default)]
    pub negative: i64,
    pub estimated_owners: Option<String>,
    #[serde(default)]
    pub average_playtime_forever: i64,
    #[serde(default)]
    pub average_playtime_2weeks: i64,
    #[serde(default)]
    pub median_playtime_forever: i64,
    #[serde(default)]
    pub median_playtime_2weeks: i64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub peak_ccu: i64,
    #[serde(default)]
    pub tags: Value,
    #[serde(default)]
    pub pct_pos_total: f64,
    #[serde(default)]
    pub num_reviews_total: i64,
    #[serde(default)]
    pub pct_pos_recent: f64,
    #[serde(default)]
    pub num_reviews_recent: i64,
    #[serde(default, rename = "isFavorite")]
    pub is_favorite: bool,
}

impl GameInput {
    /// Rewrite every list-valued field into a genuine JSON array.
    pub fn normalize_lists(mut self) -> Self {
        for value in [
            &mut self.genres,
            &mut self.categories,
            &mut self.tags,
            &mut self.developers,
            &mut self.publishers,
            &mut self.supported_languages,
            &mut self.full_audio_languages,
            &mut self.screenshots,
            &mut self.movies,
            &mut self.packages,
        ] {
            *value = Value::Array(normalize(value));
        }
        self
    }
}

/// The edit form sends `""` for a cleared date input.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => {
            // Accept full timestamps as well; only the date part is stored.
            let date_part = s.split('T').next().unwrap_or(&s);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

// ---------------------------------------------------------------------------
// Listing query
// ---------------------------------------------------------------------------

/// Case-insensitive substring match on one column.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    pub field: FieldRef,
    pub term: String,
}

/// Row filter shared by the listing and its count.
#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    pub favorites_only: bool,
    pub search: Option<SearchFilter>,
}

/// Sort key of a listing. Ties are broken by `id`.
#[derive(Debug, Clone, Copy)]
pub struct GameSort {
    pub field: FieldRef,
    pub order: SortOrder,
}
