//! Error handling - rendered error pages and login redirects.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use yatube_core::error::{DomainError, RepoError};
use yatube_core::ports::MediaError;

use crate::views::{self, ErrorTemplate, Nav};

/// Where anonymous visitors of protected pages are sent.
pub const LOGIN_URL: &str = "/auth/login/";

/// Application-level error type that converts to HTML error pages.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    PayloadTooLarge,
    Internal(String),
    /// The page needs a signed-in user; `next` is where to return afterwards.
    LoginRequired { next: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::PayloadTooLarge => write!(f, "Payload too large"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::LoginRequired { next } => write!(f, "Login required for {}", next),
        }
    }
}

/// `/auth/login/?next=<path>`, keeping slashes readable.
pub fn login_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{}?next={}", LOGIN_URL, encoded.replace("%2F", "/"))
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (title, message) = match self {
            AppError::LoginRequired { next } => {
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, login_url(next)))
                    .finish();
            }
            AppError::NotFound(detail) => {
                tracing::debug!(detail = %detail, "Not found");
                ("Page not found", "The page you requested does not exist.".to_string())
            }
            AppError::BadRequest(detail) => ("Bad request", detail.clone()),
            AppError::Conflict(detail) => ("Conflict", detail.clone()),
            AppError::PayloadTooLarge => (
                "Request too large",
                "The uploaded file is too large.".to_string(),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    "Server error",
                    "Something went wrong on our side.".to_string(),
                )
            }
        };

        error_page(self.status_code(), title, message)
    }
}

/// Render the shared error page. Never fails: falls back to plain text.
pub fn error_page(status: StatusCode, title: &str, message: String) -> HttpResponse {
    let template = ErrorTemplate {
        nav: Nav::anonymous(),
        status: status.as_u16(),
        title: title.to_string(),
        message,
    };

    match views::render(&template) {
        Ok(body) => views::html_with_status(status, body),
        Err(_) => HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(title.to_string()),
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::InvalidName(name) => AppError::NotFound(name),
            MediaError::Io(msg) => AppError::Internal(format!("Media storage: {}", msg)),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
