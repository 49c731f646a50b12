//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{alert::Alert, html::error_view, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A call to the transactions collection failed.
    ///
    /// This covers network errors, timeouts, non-success status codes and
    /// response bodies that could not be decoded. The string holds the
    /// underlying error message for logging.
    #[error("remote call failed: {0}")]
    RemoteCallFailed(String),

    /// An operation was attempted on a transaction store after it was disposed.
    #[error("the transaction store has been disposed")]
    StoreDisposed,

    /// The user submitted a transaction that cannot be created, e.g. with an
    /// empty description or a negative price.
    #[error("invalid transaction: {0}")]
    InvalidTransactionForm(String),

    /// The configured base URL for the transactions API cannot be used.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::RemoteCallFailed(_) => error_page(
                StatusCode::BAD_GATEWAY,
                "Could not reach the transactions API",
                "Check that the API server is running and try again.",
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs.",
                )
            }
        }
    }
}

/// Render a full page for errors that stop a page from loading.
fn error_page(status_code: StatusCode, description: &str, fix: &str) -> Response {
    let header = status_code.as_str();
    let title = status_code.canonical_reason().unwrap_or("Error");

    (
        status_code,
        Html(error_view(title, header, description, fix).into_string()),
    )
        .into_response()
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTransactionForm(reason) => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Invalid transaction".to_owned(),
                    details: reason,
                },
            ),
            Error::RemoteCallFailed(_) => (
                StatusCode::BAD_GATEWAY,
                Alert {
                    message: "Could not reach the transactions API".to_owned(),
                    details: "The request to the API server failed. \
                    Check that it is running and try again."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
