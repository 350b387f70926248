//! Book model and related types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

const MIN_QUERY_YEAR: i32 = 1000;
const MAX_QUERY_YEAR: i32 = 2100;

/// Full book record from the database
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(
        length(max = 255, message = "Title must be at most 255 characters"),
        custom(function = "crate::validation::validate_not_empty")
    )]
    pub title: String,
    #[validate(
        length(max = 255, message = "Author must be at most 255 characters"),
        custom(function = "crate::validation::validate_not_empty")
    )]
    pub author: String,
    /// Publication year; checked against the current year by the service
    pub year: Option<i32>,
    #[validate(custom(function = "crate::validation::validate_isbn"))]
    pub isbn: Option<String>,
}

/// Partial update request: omitted fields keep their stored values
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBook {
    #[validate(
        length(max = 255, message = "Title must be at most 255 characters"),
        custom(function = "crate::validation::validate_not_empty")
    )]
    pub title: Option<String>,
    #[validate(
        length(max = 255, message = "Author must be at most 255 characters"),
        custom(function = "crate::validation::validate_not_empty")
    )]
    pub author: Option<String>,
    pub year: Option<i32>,
    #[validate(custom(function = "crate::validation::validate_isbn"))]
    pub isbn: Option<String>,
}

/// Listing filters, combined with AND semantics
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookFilters {
    pub author: Option<String>,
    pub year: Option<i32>,
    pub title: Option<String>,
}

/// Parsed and bounds-checked listing parameters
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub filters: BookFilters,
}

impl BookQuery {
    /// Parse raw query-string parameters.
    ///
    /// Empty values are treated as absent. Out-of-range or non-integer
    /// `page`/`per_page`/`year` values reject the whole request.
    pub fn from_params(params: &HashMap<String, String>) -> AppResult<Self> {
        let page = match non_empty(params, "page") {
            Some(raw) => Some(raw.parse::<i64>().ok().filter(|p| *p >= 1).ok_or_else(|| {
                AppError::Validation(
                    "Invalid page parameter: page must be a positive integer".to_string(),
                )
            })?),
            None => None,
        };

        let per_page = match non_empty(params, "per_page") {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .ok()
                    .filter(|p| (1..=MAX_PER_PAGE).contains(p))
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "Invalid per_page parameter: per_page must be between 1 and {}",
                            MAX_PER_PAGE
                        ))
                    })?,
            ),
            None => None,
        };

        let year = match non_empty(params, "year") {
            Some(raw) => Some(
                raw.parse::<i32>()
                    .ok()
                    .filter(|y| (MIN_QUERY_YEAR..=MAX_QUERY_YEAR).contains(y))
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "Invalid year parameter: year must be between {} and {}",
                            MIN_QUERY_YEAR, MAX_QUERY_YEAR
                        ))
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            page,
            per_page,
            filters: BookFilters {
                author: non_empty(params, "author").cloned(),
                year,
                title: non_empty(params, "title").cloned(),
            },
        })
    }

    /// Whether the caller asked for the paginated response shape
    pub fn is_paginated(&self) -> bool {
        self.page.is_some() || self.per_page.is_some()
    }
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a String> {
    params.get(key).filter(|v| !v.is_empty())
}

/// Plain listing shape, returned when no pagination was requested
#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<Book>,
}

/// Paginated listing shape with metadata and the applied filters
#[derive(Debug, Serialize)]
pub struct PaginatedBooks {
    pub books: Vec<Book>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub filters: BookFilters,
}

/// Result of a listing request; which variant depends on the query
#[derive(Debug)]
pub enum BookListing {
    All(Vec<Book>),
    Paginated(PaginatedBooks),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_to_unpaginated() {
        let query = BookQuery::from_params(&params(&[])).unwrap();
        assert!(!query.is_paginated());
        assert!(query.filters.author.is_none());
    }

    #[test]
    fn either_pagination_param_switches_shape() {
        let query = BookQuery::from_params(&params(&[("page", "2")])).unwrap();
        assert!(query.is_paginated());
        assert_eq!(query.page, Some(2));
        assert_eq!(query.per_page, None);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(BookQuery::from_params(&params(&[("page", "0")])).is_err());
        assert!(BookQuery::from_params(&params(&[("page", "abc")])).is_err());
        assert!(BookQuery::from_params(&params(&[("per_page", "0")])).is_err());
        assert!(BookQuery::from_params(&params(&[("per_page", "101")])).is_err());
        assert!(BookQuery::from_params(&params(&[("year", "999")])).is_err());
        assert!(BookQuery::from_params(&params(&[("year", "2101")])).is_err());
    }

    #[test]
    fn empty_values_are_ignored() {
        let query =
            BookQuery::from_params(&params(&[("page", ""), ("author", ""), ("year", "")])).unwrap();
        assert!(!query.is_paginated());
        assert!(query.filters.author.is_none());
        assert!(query.filters.year.is_none());
    }

    #[test]
    fn filters_are_captured() {
        let query = BookQuery::from_params(&params(&[
            ("author", "Martin"),
            ("year", "2008"),
            ("title", "Clean"),
        ]))
        .unwrap();
        assert_eq!(query.filters.author.as_deref(), Some("Martin"));
        assert_eq!(query.filters.year, Some(2008));
        assert_eq!(query.filters.title.as_deref(), Some("Clean"));
    }
}
