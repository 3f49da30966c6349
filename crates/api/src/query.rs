//! Query parameter types for the games API.

use gamedex_core::game::{
    SortOrder, DEFAULT_PAGE_LIMIT, DEFAULT_SEARCH_FIELD, DEFAULT_SORT_FIELD,
};
use serde::{Deserialize, Deserializer};

/// Query parameters for `GET /api/games`.
///
/// Names follow the table UI (`sortBy`, `searchTerm`, ...). Every parameter
/// is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListParams {
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_search_field")]
    pub search_field: String,
    #[serde(default)]
    pub search_term: String,
    /// Only the literal `true` enables the filter.
    #[serde(default, deserialize_with = "true_only")]
    pub show_only_favorites: bool,
}

impl Default for GameListParams {
    fn default() -> Self {
        Self {
            sort_by: default_sort_by(),
            order: SortOrder::default(),
            page: default_page(),
            limit: default_limit(),
            search_field: default_search_field(),
            search_term: String::new(),
            show_only_favorites: false,
        }
    }
}

fn default_sort_by() -> String {
    DEFAULT_SORT_FIELD.to_string()
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

fn default_search_field() -> String {
    DEFAULT_SEARCH_FIELD.to_string()
}

fn true_only<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)? == "true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(uri: &str) -> GameListParams {
        let uri: Uri = uri.parse().unwrap();
        Query::<GameListParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn missing_parameters_use_defaults() {
        let params = parse("/api/games");
        assert_eq!(params.sort_by, "name");
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_PAGE_LIMIT);
        assert!(!params.show_only_favorites);
    }

    #[test]
    fn favorites_flag_is_only_set_by_true() {
        assert!(parse("/api/games?showOnlyFavorites=true").show_only_favorites);
        assert!(!parse("/api/games?showOnlyFavorites=false").show_only_favorites);
        assert!(!parse("/api/games?showOnlyFavorites=yes").show_only_favorites);
        assert!(!parse("/api/games?showOnlyFavorites=").show_only_favorites);
    }

    #[test]
    fn non_numeric_page_is_rejected() {
        let uri: Uri = "/api/games?page=abc".parse().unwrap();
        assert!(Query::<GameListParams>::try_from_uri(&uri).is_err());
    }
}
