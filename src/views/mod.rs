//! Derived views over the store's collections.
//!
//! Everything here is read-only and recomputed on every call.

mod availability;
mod stats;

pub use availability::*;
pub use stats::*;

use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::Tabular;

/// Categorical filter value that matches everything.
pub const ALL: &str = "all";

/// Query parameter carrying the free-text query.
pub const QUERY_PARAM: &str = "q";
/// Query parameter overriding the searched fields (comma separated).
pub const FIELDS_PARAM: &str = "fields";
/// Query parameter selecting export columns; ignored by filtering.
pub const COLUMNS_PARAM: &str = "columns";

/// Case-insensitive substring match against any of `fields`. An empty query matches.
pub fn matches_search<T: Tabular>(item: &T, query: &str, fields: &[&str]) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields.iter().any(|name| {
        item.field(name)
            .is_some_and(|value| value.to_lowercase().contains(&needle))
    })
}

/// Exact equality on one field. [`ALL`] short-circuits to true.
pub fn matches_category<T: Tabular>(item: &T, field: &str, value: &str) -> bool {
    if value == ALL {
        return true;
    }
    item.field(field).is_some_and(|actual| actual == value)
}

pub fn filter_by_search<'a, T: Tabular + 'a>(
    items: impl IntoIterator<Item = &'a T>,
    query: &str,
    fields: &[&str],
) -> Vec<&'a T> {
    items
        .into_iter()
        .filter(|item| matches_search(*item, query, fields))
        .collect()
}

pub fn filter_by_category<'a, T: Tabular + 'a>(
    items: impl IntoIterator<Item = &'a T>,
    field: &str,
    value: &str,
) -> Vec<&'a T> {
    items
        .into_iter()
        .filter(|item| matches_category(*item, field, value))
        .collect()
}

/// Text query plus categorical filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub query: String,
    /// Searched fields; empty means the record type's defaults.
    pub fields: Vec<String>,
    pub categories: Vec<(String, String)>,
}

impl ListFilter {
    /// Build a filter from query parameters, rejecting field names `T` does not have.
    ///
    /// `q` and `fields` drive the text search, `columns` is skipped, and every
    /// other key is a categorical filter on the field of that name.
    pub fn from_params<T: Tabular>(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let mut filter = ListFilter::default();

        for (key, value) in params {
            match key.as_str() {
                QUERY_PARAM => filter.query = value.clone(),
                FIELDS_PARAM => filter.fields = split_names::<T>(value)?,
                COLUMNS_PARAM => {}
                field => {
                    if !T::is_field(field) {
                        return Err(unknown_field(field));
                    }
                    filter.categories.push((field.to_string(), value.clone()));
                }
            }
        }

        // HashMap order is arbitrary; keep matching deterministic.
        filter.categories.sort();
        Ok(filter)
    }

    /// Matching items in their original order.
    pub fn apply<'a, T: Tabular>(&self, items: &'a [T]) -> Vec<&'a T> {
        let fields: Vec<&str> = if self.fields.is_empty() {
            T::SEARCH_FIELDS.to_vec()
        } else {
            self.fields.iter().map(String::as_str).collect()
        };

        let mut matched = filter_by_search(items, &self.query, &fields);
        for (field, value) in &self.categories {
            matched = filter_by_category(matched, field, value);
        }
        matched
    }
}

/// Parse a comma-separated list of field names, checking each against `T`.
pub fn split_names<T: Tabular>(raw: &str) -> Result<Vec<String>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            if T::is_field(name) {
                Ok(name.to_string())
            } else {
                Err(unknown_field(name))
            }
        })
        .collect()
}

fn unknown_field(name: &str) -> AppError {
    AppError::BadRequest(format!("Unknown field '{}'", name))
}
