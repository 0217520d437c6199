//! Film listing.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_LIMIT: i64 = 20;

/// A film with the number of copies that can be rented right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    /// Inventory copies minus rentals not yet returned.
    pub available_to_rent: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MoviesResponse {
    pub data: Vec<Movie>,
}

/// Ordering by release year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword; the only text interpolated into the listing query.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query string of `GET /v1/movies`.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovieQueryParams {
    /// Page size, 1 to 20 (default 20)
    #[validate(range(min = 1, max = 20))]
    pub limit: Option<i64>,
    /// Rows to skip (default 0)
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
    /// `asc` or `desc` by release year (default `desc`)
    pub sort: Option<SortOrder>,
    /// Case-insensitive match on title or description
    #[validate(length(max = 100))]
    pub search: Option<String>,
}

/// Listing parameters with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub limit: i64,
    pub offset: i64,
    pub sort: SortOrder,
    pub search: String,
}

impl From<MovieQueryParams> for MovieQuery {
    fn from(params: MovieQueryParams) -> Self {
        Self {
            limit: params.limit.unwrap_or(DEFAULT_LIMIT),
            offset: params.offset.unwrap_or(0),
            sort: params.sort.unwrap_or_default(),
            search: params.search.unwrap_or_default(),
        }
    }
}

impl Default for MovieQuery {
    fn default() -> Self {
        MovieQueryParams::default().into()
    }
}
