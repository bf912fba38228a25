use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};
use crate::models::parse_due_day;

/// `?id=` selector used by PATCH and DELETE
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdParams {
    pub id: i64,
}

/// A required text field: must be present and not blank
pub fn validate_required(field: &str, value: Option<String>) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

/// An optional text field that may not be blanked once supplied
pub fn validate_optional(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(AppError::Validation(format!("{} cannot be empty", field)))
        }
        other => Ok(other),
    }
}

/// A blank due date counts as absent, so PATCH keeps the stored value
pub fn validate_due_date(value: Option<String>) -> AppResult<Option<String>> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) if parse_due_day(&v).is_none() => Err(AppError::Validation(format!(
            "dueDate must start with a YYYY-MM-DD date, got {:?}",
            v
        ))),
        other => Ok(other),
    }
}
