use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;

use crate::response::{redirect_with_flash, Flash};

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`{0}` must not be empty")]
    MissingField(&'static str),
    #[error("title and content must not be empty")]
    EmptyNote,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("username already exists")]
    DuplicateUsername,
    #[error("invalid username or password")]
    AuthenticationFailure,
    /// Covers both a missing note and one owned by somebody else.
    #[error("note is not available to this user")]
    AuthorizationFailure,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// The message shown to the user after the redirect.
    pub fn flash(&self) -> Flash {
        match self {
            AppError::Validation(ValidationError::MissingField(_)) => {
                Flash::danger("Please fill out all fields.")
            }
            AppError::Validation(ValidationError::EmptyNote) => {
                Flash::danger("Title and content cannot be empty.")
            }
            AppError::DuplicateUsername => Flash::danger("Username already exists."),
            AppError::AuthenticationFailure => Flash::danger("Invalid username or password."),
            AppError::AuthorizationFailure => Flash::danger("You don't have access to this note."),
            AppError::Database(_) | AppError::PasswordHash(_) | AppError::Token(_) => {
                Flash::danger("Something went wrong. Please try again.")
            }
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::PasswordHash(_) | AppError::Token(_)
        )
    }

    /// Logs the error and turns it into a redirect carrying its flash message.
    pub fn redirect(self, jar: CookieJar, to: &str) -> Response {
        if self.is_internal() {
            tracing::error!(error = %self, redirect = to, "request failed");
        } else {
            tracing::debug!(error = %self, redirect = to, "request rejected");
        }
        let flash = self.flash();
        redirect_with_flash(jar, to, flash)
    }
}
