// Validation utilities for request bodies and string fields

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    FromRequest, FromRequestParts,
};

use crate::utils::api_error::ApiError;

/// JSON body extractor whose rejection is an `ApiError` (400 envelope)
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationError(rejection.body_text())
    }
}

/// Path extractor whose rejection is an `ApiError` (400 envelope)
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::ValidationError(rejection.body_text())
    }
}

/// Require a field that clients may omit entirely
pub fn required_field(name: &str, field: Option<&String>) -> Result<String, ApiError> {
    trim_optional_field(field)
        .ok_or_else(|| ApiError::ValidationError(format!("{} is required", name)))
}

/// Trimmed value, or `None` when absent or blank
pub fn trim_optional_field(field: Option<&String>) -> Option<String> {
    field.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field() {
        assert_eq!(
            required_field("email", Some(&"  a@b.com ".to_string())).unwrap(),
            "a@b.com"
        );
        assert!(matches!(
            required_field("email", None),
            Err(ApiError::ValidationError(msg)) if msg == "email is required"
        ));
        assert!(required_field("email", Some(&"   ".to_string())).is_err());
    }

    #[test]
    fn test_trim_optional_field() {
        assert_eq!(trim_optional_field(Some(&" x ".to_string())), Some("x".to_string()));
        assert_eq!(trim_optional_field(Some(&"  ".to_string())), None);
        assert_eq!(trim_optional_field(None), None);
    }
}
