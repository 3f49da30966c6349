//! Game record field catalog, table columns and pagination helpers.
//!
//! Column names coming from query strings are only ever interpolated into
//! SQL after being resolved against the allowlists in this module.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field catalog
// ---------------------------------------------------------------------------

/// Fields stored as JSON lists.
pub const LIST_FIELDS: [&str; 10] = [
    "genres",
    "categories",
    "tags",
    "developers",
    "publishers",
    "supported_languages",
    "full_audio_languages",
    "screenshots",
    "movies",
    "packages",
];

/// Scalar columns of the `games` table that can be sorted and searched.
pub const SCALAR_FIELDS: &[&str] = &[
    "id",
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
    "pct_pos_total",
    "num_reviews_total",
    "pct_pos_recent",
    "num_reviews_recent",
    "is_favorite",
    "created_at",
    "updated_at",
];

/// A query-string field name resolved to a known column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    Scalar(&'static str),
    List(&'static str),
}

impl FieldRef {
    /// The SQL column name. Always one of the static allowlist entries.
    pub fn column(self) -> &'static str {
        match self {
            FieldRef::Scalar(c) | FieldRef::List(c) => c,
        }
    }
}

/// Check whether a field holds a list.
pub fn is_list_field(field: &str) -> bool {
    LIST_FIELDS.contains(&field)
}

/// Resolve a field name as it appears in requests to a table column.
///
/// `isFavorite` is accepted as the JSON name of `is_favorite`.
pub fn resolve_field(name: &str) -> Option<FieldRef> {
    let name = if name == "isFavorite" { "is_favorite" } else { name };

    if let Some(col) = LIST_FIELDS.iter().copied().find(|f| *f == name) {
        return Some(FieldRef::List(col));
    }
    SCALAR_FIELDS
        .iter()
        .copied()
        .find(|f| *f == name)
        .map(FieldRef::Scalar)
}

// ---------------------------------------------------------------------------
// Table columns
// ---------------------------------------------------------------------------

/// How a table column renders its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    Price,
    List,
    /// Computed from the `windows`, `mac` and `linux` flags.
    Platforms,
}

/// A column of the games table UI.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    /// Always visible; cannot be toggled off.
    pub locked: bool,
    pub sortable: bool,
    pub searchable: bool,
}

const fn column(key: &'static str, label: &'static str, kind: ColumnKind) -> Column {
    let computed = matches!(kind, ColumnKind::Platforms);
    Column {
        key,
        label,
        kind,
        locked: false,
        sortable: !computed,
        searchable: !computed,
    }
}

/// The column that can never be hidden.
pub const LOCKED_COLUMN: &str = "name";

/// Columns shown by the table UI, in display order.
pub const TABLE_COLUMNS: &[Column] = &[
    Column {
        locked: true,
        ..column("name", "Name", ColumnKind::Text)
    },
    column("platforms", "Platforms", ColumnKind::Platforms),
    column("price", "Price", ColumnKind::Price),
    column("release_date", "Release Date", ColumnKind::Date),
    column("required_age", "Required Age", ColumnKind::Number),
    column("dlc_count", "DLCs", ColumnKind::Number),
    column("metacritic_score", "Metacritic", ColumnKind::Number),
    column("user_score", "User Score", ColumnKind::Number),
    column("positive", "Positive Reviews", ColumnKind::Number),
    column("negative", "Negative Reviews", ColumnKind::Number),
    column("achievements", "Achievements", ColumnKind::Number),
    column("recommendations", "Recommendations", ColumnKind::Number),
    column("estimated_owners", "Est. Owners", ColumnKind::Text),
    column("average_playtime_forever", "Avg. Playtime", ColumnKind::Number),
    column("peak_ccu", "Peak CCU", ColumnKind::Number),
    column("developers", "Developers", ColumnKind::List),
    column("publishers", "Publishers", ColumnKind::List),
    column("genres", "Genres", ColumnKind::List),
    column("categories", "Categories", ColumnKind::List),
    column("tags", "Tags", ColumnKind::List),
    column("supported_languages", "Languages", ColumnKind::List),
];

// ---------------------------------------------------------------------------
// Sorting and pagination
// ---------------------------------------------------------------------------

/// Default sort column for listings.
pub const DEFAULT_SORT_FIELD: &str = "name";

/// Default search column for listings.
pub const DEFAULT_SEARCH_FIELD: &str = "name";

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum page size.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Sort direction of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Rows to skip for a 1-indexed page.
///
/// Saturates at `i64::MAX`, which the store treats as past the end.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).max(0).saturating_mul(limit)
}

/// `ceil(total / limit)`, zero for an empty result or a non-positive limit.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
