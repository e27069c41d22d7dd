use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// Highest page number a list endpoint will serve; keeps `(page - 1) * per_page` in range.
pub const MAX_PAGE: u64 = 100_000;

/// Clamp raw `page`/`per_page` query values to `(1..=MAX_PAGE, 1..=100)`, defaulting to `(1, 20)`.
pub fn page_params(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    (
        page.unwrap_or(1).clamp(1, MAX_PAGE),
        per_page.unwrap_or(20).clamp(1, 100),
    )
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a trimmed, required text field of at most `max` Unicode characters.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// Same as [`validate_text`], skipped when the value is absent.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_text(field, v, max),
        None => Ok(()),
    }
}

/// Validate an integer field against an inclusive range.
pub fn validate_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), AppError> {
    if value < min || value > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

/// Validate an integer field against a fixed list of allowed values.
pub fn validate_choice(field: &str, value: i32, allowed: &[i32]) -> Result<(), AppError> {
    if !allowed.contains(&value) {
        let allowed = allowed
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::Validation(format!(
            "{field} must be one of: {allowed}"
        )));
    }
    Ok(())
}

/// Loose email shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(field: &str, value: &str) -> Result<(), AppError> {
    let valid = value.chars().count() <= 254
        && !value.chars().any(char::is_whitespace)
        && match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };
    if !valid {
        return Err(AppError::Validation(format!(
            "{field} must be a valid email address"
        )));
    }
    Ok(())
}

/// Phone numbers: up to 15 characters of digits, spaces, `+` and `-`.
pub fn validate_phone(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty()
        || value.chars().count() > 15
        || !value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '))
    {
        return Err(AppError::Validation(format!(
            "{field} must be up to 15 digits"
        )));
    }
    Ok(())
}

/// Validate an ID list for bulk operations (non-empty, no duplicates, max length).
pub fn validate_bulk_ids(ids: &[i32], name: &str, max: usize) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }
    if ids.len() > max {
        return Err(AppError::Validation(format!("Too many {name}: max {max}")));
    }
    let mut seen = HashSet::new();
    for &id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!("Duplicate {name} ID: {id}")));
        }
    }
    Ok(())
}
