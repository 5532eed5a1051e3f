use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use learnhub_domain::enrollment::EnrollmentStatus;

/// Courses service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum CoursesServiceError {
    #[error("course not found")]
    CourseNotFound,
    #[error("enrollment not found")]
    EnrollmentNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("student is already enrolled in this course")]
    AlreadyEnrolled,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("title must not be empty")]
    InvalidTitle,
    #[error("at least one role is required")]
    MissingRoles,
    #[error("user id must not be empty")]
    InvalidUserId,
    #[error("path and body identifiers differ")]
    IdMismatch,
    #[error("cannot change status from {from} to {to}")]
    InvalidTransition {
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    },
    #[error("course was modified by another request")]
    ConcurrencyConflict,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl CoursesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::EnrollmentNotFound => "ENROLLMENT_NOT_FOUND",
            Self::StudentNotFound => "STUDENT_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::InvalidTitle => "INVALID_TITLE",
            Self::MissingRoles => "MISSING_ROLES",
            Self::InvalidUserId => "INVALID_USER_ID",
            Self::IdMismatch => "ID_MISMATCH",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for CoursesServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::CourseNotFound
            | Self::EnrollmentNotFound
            | Self::StudentNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyEnrolled
            | Self::InvalidTitle
            | Self::MissingRoles
            | Self::InvalidUserId
            | Self::IdMismatch
            | Self::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            Self::UserAlreadyExists | Self::ConcurrencyConflict => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
