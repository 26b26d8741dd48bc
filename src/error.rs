use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Failure category reported to clients alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    CapacityExceeded,
    Unauthorized,
    Forbidden,
    Internal,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    InternalError,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(_) | AppError::InternalError => ErrorKind::Internal,
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::CapacityExceeded(_) => ErrorKind::CapacityExceeded,
            AppError::Unauthorized(_) => ErrorKind::Unauthorized,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict | ErrorKind::CapacityExceeded => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a unique-constraint violation on `constraint` to `Conflict(message)`,
    /// leaving every other error untouched.
    pub fn on_unique_violation(self, constraint: &str, message: &str) -> Self {
        if let AppError::Database(sqlx::Error::Database(ref db_err)) = self {
            if db_err.is_unique_violation() && db_err.constraint() == Some(constraint) {
                return AppError::Conflict(message.to_string());
            }
        }
        self
    }
}

/// Message of the first failing field, falling back to a generic description.
pub fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| (field, e)))
        .next()
        .map(|(field, err)| match &err.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value for {}", field),
        })
        .unwrap_or_else(|| "Invalid input".to_string())
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(first_validation_message(&err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let error_message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error occurred".to_string()
            }
            AppError::InternalError => "Internal server error".to_string(),
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::CapacityExceeded(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg) => msg,
        };

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
        name: String,
        #[validate(email(message = "Please enter a valid email address"))]
        email: String,
    }

    #[test]
    fn test_error_kind_status_mapping() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::CapacityExceeded("x".into()).kind(), ErrorKind::CapacityExceeded);
        assert_eq!(AppError::CapacityExceeded("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InternalError.kind(), ErrorKind::Internal);
        assert_eq!(AppError::Database(sqlx::Error::RowNotFound).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_reports_single_field_message() {
        let form = Form { name: "A".into(), email: "ok@example.com".into() };
        let err: AppError = form.validate().unwrap_err().into();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Name must be at least 2 characters"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validation_message_is_deterministic_with_multiple_failures() {
        let form = Form { name: "A".into(), email: "nope".into() };
        let errors = form.validate().unwrap_err();
        // fields are visited in name order, so "email" wins over "name"
        assert_eq!(first_validation_message(&errors), "Please enter a valid email address");
    }

    #[test]
    fn test_on_unique_violation_leaves_other_errors() {
        let err = AppError::NotFound("Program not found".into())
            .on_unique_violation("enrollments_user_program_key", "dup");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
