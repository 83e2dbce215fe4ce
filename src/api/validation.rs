use crate::api::errors::ApiError;

/// Require a non-empty value after trimming, returning the trimmed text.
pub(crate) fn required_trimmed(value: &str, field: &'static str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::BadRequest(format!("{field} must not be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Scores arrive as floating point; NaN or infinite values are rejected
/// before they can reach the store.
pub(crate) fn finite_score(value: f64, field: &'static str) -> Result<f64, ApiError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ApiError::BadRequest(format!("{field} must be a finite number")))
    }
}
